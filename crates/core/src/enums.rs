use serde::{Deserialize, Serialize};
use std::fmt;

/// Result of decoding an enum-backed text field. Historical data may hold
/// free-form strings written by earlier schema versions, so decoding is
/// total: an unrecognized value comes back as `Invalid` with the raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded<T> {
    Known(T),
    Invalid(String),
}

impl<T> Decoded<T> {
    pub fn is_known(&self) -> bool {
        matches!(self, Decoded::Known(_))
    }

    pub fn known(self) -> Option<T> {
        match self {
            Decoded::Known(v) => Some(v),
            Decoded::Invalid(_) => None,
        }
    }
}

/// Common surface of every enum-backed text field. Lets the normalization
/// pass be written once, generically, with the per-field policy kept in an
/// explicit table instead of inline fallbacks.
pub trait TextEnum: Copy + Sized {
    fn as_str(&self) -> &'static str;
    fn decode(raw: &str) -> Decoded<Self>;
}

macro_rules! text_enum {
    ($name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }

            /// Decode stored text: trim whitespace, match case-insensitively.
            pub fn decode(raw: &str) -> Decoded<Self> {
                match raw.trim().to_ascii_lowercase().as_str() {
                    $($text => Decoded::Known(Self::$variant),)+
                    _ => Decoded::Invalid(raw.to_string()),
                }
            }
        }

        impl TextEnum for $name {
            fn as_str(&self) -> &'static str {
                $name::as_str(self)
            }

            fn decode(raw: &str) -> Decoded<Self> {
                $name::decode(raw)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

text_enum!(TemplateKey {
    Classic => "classic",
    Minimal => "minimal",
    Professional => "professional",
});

text_enum!(InvoiceStatus {
    Draft => "draft",
    Sent => "sent",
    Paid => "paid",
    Overdue => "overdue",
    Void => "void",
});

text_enum!(ContractStatus {
    Draft => "draft",
    Sent => "sent",
    Signed => "signed",
    Declined => "declined",
});

text_enum!(JobStage {
    Booked => "booked",
    InProgress => "in_progress",
    Completed => "completed",
    Canceled => "canceled",
});

impl Default for TemplateKey {
    fn default() -> Self {
        Self::Classic
    }
}

impl Default for InvoiceStatus {
    fn default() -> Self {
        Self::Draft
    }
}

impl Default for ContractStatus {
    fn default() -> Self {
        Self::Draft
    }
}

impl Default for JobStage {
    fn default() -> Self {
        Self::Booked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_exact_match() {
        assert_eq!(JobStage::decode("booked"), Decoded::Known(JobStage::Booked));
        assert_eq!(
            TemplateKey::decode("professional"),
            Decoded::Known(TemplateKey::Professional)
        );
    }

    #[test]
    fn decode_trims_and_ignores_case() {
        assert_eq!(
            JobStage::decode("  Completed \n"),
            Decoded::Known(JobStage::Completed)
        );
        assert_eq!(
            InvoiceStatus::decode("OVERDUE"),
            Decoded::Known(InvoiceStatus::Overdue)
        );
    }

    #[test]
    fn decode_preserves_invalid_raw_text() {
        match JobStage::decode("finished") {
            Decoded::Invalid(raw) => assert_eq!(raw, "finished"),
            other => panic!("expected Invalid, got {other:?}"),
        }
    }

    #[test]
    fn as_str_roundtrip() {
        for stage in [
            JobStage::Booked,
            JobStage::InProgress,
            JobStage::Completed,
            JobStage::Canceled,
        ] {
            assert_eq!(JobStage::decode(stage.as_str()), Decoded::Known(stage));
        }
    }
}
