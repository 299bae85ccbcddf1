//! REST functions exposed by the Karotz API.

use std::fmt;

/// An API function, i.e. the path segment following the base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Function {
    /// Open an interactive session (signed).
    Start,
    /// Interactive session control (`action=stop`).
    InteractiveMode,
    /// Ear motors.
    Ears,
    /// Nose LED.
    Led,
    /// Text to speech.
    Tts,
}

impl Function {
    /// Get the function name used in request paths.
    pub fn as_str(&self) -> &'static str {
        match self {
            Function::Start => "start",
            Function::InteractiveMode => "interactivemode",
            Function::Ears => "ears",
            Function::Led => "led",
            Function::Tts => "tts",
        }
    }

    /// Parse a function from its path name.
    pub fn from_name(name: &str) -> Option<Function> {
        match name {
            "start" => Some(Function::Start),
            "interactivemode" => Some(Function::InteractiveMode),
            "ears" => Some(Function::Ears),
            "led" => Some(Function::Led),
            "tts" => Some(Function::Tts),
            _ => None,
        }
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_names() {
        for function in [
            Function::Start,
            Function::InteractiveMode,
            Function::Ears,
            Function::Led,
            Function::Tts,
        ] {
            assert_eq!(Function::from_name(function.as_str()), Some(function));
        }
        assert_eq!(Function::from_name("Led"), None);
    }
}
