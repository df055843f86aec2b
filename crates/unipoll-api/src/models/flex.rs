// Number-or-string JSON values.
//
// The controller emits the same field as `5`, `"5"`, `5.0`, or `""`
// depending on firmware version and device family. `Flex` absorbs all
// of those into one numeric value.

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

/// A numeric field that may arrive as a JSON number, string, or bool.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Flex {
    pub val: f64,
}

impl Flex {
    pub fn new(val: f64) -> Self {
        Self { val }
    }

    /// The value formatted as text, without a trailing `.0` for integers.
    pub fn txt(&self) -> String {
        if self.val.fract() == 0.0 && self.val.abs() < 1e15 {
            format!("{}", self.val as i64)
        } else {
            format!("{}", self.val)
        }
    }

    pub fn as_i64(&self) -> i64 {
        self.val as i64
    }
}

impl From<f64> for Flex {
    fn from(val: f64) -> Self {
        Self { val }
    }
}

impl From<i64> for Flex {
    fn from(val: i64) -> Self {
        Self { val: val as f64 }
    }
}

impl Serialize for Flex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.val)
    }
}

impl<'de> Deserialize<'de> for Flex {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FlexVisitor;

        impl Visitor<'_> for FlexVisitor {
            type Value = Flex;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a number, numeric string, bool, or null")
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Flex, E> {
                Ok(Flex::new(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Flex, E> {
                Ok(Flex::new(v as f64))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Flex, E> {
                Ok(Flex::new(v as f64))
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<Flex, E> {
                Ok(Flex::new(if v { 1.0 } else { 0.0 }))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Flex, E> {
                Ok(Flex::new(v.trim().parse().unwrap_or_default()))
            }

            fn visit_unit<E: de::Error>(self) -> Result<Flex, E> {
                Ok(Flex::default())
            }

            fn visit_none<E: de::Error>(self) -> Result<Flex, E> {
                Ok(Flex::default())
            }
        }

        deserializer.deserialize_any(FlexVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::Flex;

    #[derive(serde::Deserialize)]
    struct Holder {
        #[serde(default)]
        v: Flex,
    }

    #[test]
    fn parses_number_string_bool_null() {
        for (raw, want) in [
            (r#"{"v": 42}"#, 42.0),
            (r#"{"v": 4.5}"#, 4.5),
            (r#"{"v": "17"}"#, 17.0),
            (r#"{"v": "not a number"}"#, 0.0),
            (r#"{"v": true}"#, 1.0),
            (r#"{"v": null}"#, 0.0),
            (r#"{}"#, 0.0),
        ] {
            let h: Holder = serde_json::from_str(raw).unwrap();
            assert_eq!(h.v.val, want, "input: {raw}");
        }
    }

    #[test]
    fn txt_drops_integer_fraction() {
        assert_eq!(Flex::new(5.0).txt(), "5");
        assert_eq!(Flex::new(5.25).txt(), "5.25");
    }
}
