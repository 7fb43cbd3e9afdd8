//! (De)serialize [`Compression`] by its configuration name.

use crate::Compression;
use serde::de::{Error as DeError, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Formatter, Result as FmtResult};

impl Serialize for Compression {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

struct CompressionVisitor;
impl Visitor<'_> for CompressionVisitor {
    type Value = Compression;

    fn expecting(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str("a compression format name such as \"gzip\" or \"xz\"")
    }

    fn visit_str<E: DeError>(self, value: &str) -> Result<Compression, E> {
        value.parse().map_err(|err: crate::error::Error| E::custom(&*err))
    }
}

impl<'de> Deserialize<'de> for Compression {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_str(CompressionVisitor)
    }
}

#[cfg(test)]
mod tests {
    use crate::Compression;
    use serde::Deserialize;
    use serde::de::IntoDeserializer;
    use serde::de::value::{Error as ValueError, StrDeserializer};

    #[test]
    fn deserializes_aliases() {
        let de: StrDeserializer<'_, ValueError> = "gz".into_deserializer();
        assert_eq!(Compression::deserialize(de).unwrap(), Compression::Gzip);
        let de: StrDeserializer<'_, ValueError> = "bzip2".into_deserializer();
        assert_eq!(Compression::deserialize(de).unwrap(), Compression::Bzip2);
    }

    #[test]
    fn rejects_unknown_names() {
        let de: StrDeserializer<'_, ValueError> = "rar".into_deserializer();
        assert!(Compression::deserialize(de).is_err());
    }
}
