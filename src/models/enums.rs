use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

// Class labels emitted by the grading model, one per severity code.
str_enum!(DrStage {
    NoDr => "No DR",
    Mild => "Mild",
    Moderate => "Moderate",
    Severe => "Severe",
    Proliferative => "Proliferative DR",
});

// Canonical disease names the assistant recognizes.
str_enum!(Disease {
    DiabeticRetinopathy => "diabetic retinopathy",
    Glaucoma => "glaucoma",
    Cataracts => "cataracts",
    MacularDegeneration => "macular degeneration",
});

str_enum!(Speaker {
    User => "user",
    Assistant => "assistant",
});

impl DrStage {
    /// Disease a graded stage belongs to. `None` for a clean scan.
    pub fn disease(&self) -> Option<Disease> {
        match self {
            Self::NoDr => None,
            Self::Mild | Self::Moderate | Self::Severe | Self::Proliferative => {
                Some(Disease::DiabeticRetinopathy)
            }
        }
    }
}
