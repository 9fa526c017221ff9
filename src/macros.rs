/// Compile a pattern literal once into a process-wide `Regex` and return a
/// `&'static` reference to it.
macro_rules! regex {
    ($pat:literal) => {{
        static RE: once_cell::sync::Lazy<regex::Regex> =
            once_cell::sync::Lazy::new(|| regex::Regex::new($pat).expect("grammar pattern must compile"));
        &*RE
    }};
}

/// Declare the error catalog.
///
/// Each entry becomes an `ErrorKind` variant with a fixed symbolic name,
/// numeric code, level and message. The tables are `const fn` matches, so the
/// catalog cannot change at runtime.
///
/// ```text
/// InvalidRule => { name: "INVALID_RULE", code: 200, level: Rule, message: "..." },
/// ```
macro_rules! error_catalog {
    (
        $(
            $(#[$meta:meta])*
            $variant:ident => {
                name: $name:literal,
                code: $code:literal,
                level: $level:ident,
                message: $message:literal $(,)?
            }
        ),* $(,)?
    ) => {
        /// Every error kind the parser and the fulfillment pass can report.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum ErrorKind {
            $( $(#[$meta])* $variant, )*
        }

        impl ErrorKind {
            /// All kinds, in catalog order.
            pub const ALL: &'static [ErrorKind] = &[ $( ErrorKind::$variant ),* ];

            /// Symbolic name, e.g. `"INVALID_RULE"`.
            pub const fn name(self) -> &'static str {
                match self {
                    $( ErrorKind::$variant => $name, )*
                }
            }

            /// Stable numeric code.
            pub const fn code(self) -> u16 {
                match self {
                    $( ErrorKind::$variant => $code, )*
                }
            }

            /// Scope the error aborts: the whole stream, one order line, or one allocation.
            pub const fn level(self) -> ErrorLevel {
                match self {
                    $( ErrorKind::$variant => ErrorLevel::$level, )*
                }
            }

            /// Human-readable message template.
            pub const fn message(self) -> &'static str {
                match self {
                    $( ErrorKind::$variant => $message, )*
                }
            }
        }
    };
}
