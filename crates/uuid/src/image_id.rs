//! Internal implementation of the image identifier.

use crate::{UuidError, UuidResult};
use rand::RngCore;
use std::{fmt, str::FromStr};

use ::uuid::Uuid;

/// Lengths of the five hyphen-separated groups of a UUID.
const GROUP_LENGTHS: [usize; 5] = [8, 4, 4, 4, 12];

/// imgvault's image identifier (version-4 UUID, hyphenated).
///
/// Once constructed, the contained string is guaranteed to satisfy the UUID v4 grammar. The
/// string is stored exactly as supplied, so an identifier parsed from `"550E8400-..."` is not
/// equal to one parsed from `"550e8400-..."`.
///
/// # Construction
/// - [`ImageId::generate`] allocates a fresh identifier (lowercase).
/// - [`ImageId::generate_from_rng`] allocates one from a caller-supplied random source.
/// - [`ImageId::parse`] validates an externally supplied identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageId(String);

impl Default for ImageId {
    fn default() -> Self {
        Self::generate()
    }
}

impl ImageId {
    /// Generates a new identifier.
    ///
    /// Backed by the `uuid` crate's v4 generator, which draws from the operating system's
    /// cryptographically secure random source.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().hyphenated().to_string())
    }

    /// Generates a new identifier from the given random source.
    ///
    /// The version and variant bits are set as RFC 4122 requires, so the result always passes
    /// [`ImageId::parse`]. Seeded generators make identifier allocation reproducible in tests.
    pub fn generate_from_rng<R: RngCore + ?Sized>(rng: &mut R) -> Self {
        let mut bytes = [0u8; 16];
        rng.fill_bytes(&mut bytes);
        let uuid = ::uuid::Builder::from_random_bytes(bytes).into_uuid();
        Self(uuid.hyphenated().to_string())
    }

    /// Validates and wraps an externally supplied identifier.
    ///
    /// # Errors
    ///
    /// Returns [`UuidError::InvalidFormat`] unless `input` is a hyphenated version-4 UUID.
    pub fn parse(input: &str) -> UuidResult<Self> {
        if Self::is_valid(input) {
            return Ok(Self(input.to_owned()));
        }
        Err(UuidError::InvalidFormat(format!(
            "expected a hyphenated version-4 UUID, got: '{}'",
            input
        )))
    }

    /// Returns true if `input` matches the UUID v4 grammar (case-insensitive).
    pub fn is_valid(input: &str) -> bool {
        let groups: Vec<&str> = input.split('-').collect();
        if groups.len() != GROUP_LENGTHS.len() {
            return false;
        }

        let well_formed = groups
            .iter()
            .zip(GROUP_LENGTHS)
            .all(|(group, len)| group.len() == len && group.bytes().all(|b| b.is_ascii_hexdigit()));
        if !well_formed {
            return false;
        }

        let version = groups[2].as_bytes()[0];
        let variant = groups[3].as_bytes()[0].to_ascii_lowercase();
        version == b'4' && matches!(variant, b'8' | b'9' | b'a' | b'b')
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ImageId {
    type Err = UuidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ImageId::parse(s)
    }
}

impl AsRef<str> for ImageId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for ImageId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for ImageId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ImageId::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generate_produces_valid_v4() {
        let id = ImageId::generate();

        assert_eq!(id.as_str().len(), 36);
        assert!(ImageId::is_valid(id.as_str()));
        assert_eq!(Uuid::parse_str(id.as_str()).unwrap().get_version_num(), 4);
    }

    #[test]
    fn test_generate_is_lowercase() {
        let id = ImageId::generate();
        assert_eq!(id.as_str(), id.as_str().to_lowercase());
    }

    #[test]
    fn test_generate_twice_differs() {
        assert_ne!(ImageId::generate(), ImageId::generate());
    }

    #[test]
    fn test_generate_from_rng_is_deterministic() {
        let mut rng1 = StdRng::seed_from_u64(7);
        let mut rng2 = StdRng::seed_from_u64(7);

        let id1 = ImageId::generate_from_rng(&mut rng1);
        let id2 = ImageId::generate_from_rng(&mut rng2);

        assert_eq!(id1, id2);
        assert!(ImageId::is_valid(id1.as_str()));
    }

    #[test]
    fn test_generate_from_rng_sets_version_and_variant() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..64 {
            let id = ImageId::generate_from_rng(&mut rng);
            assert!(ImageId::parse(id.as_str()).is_ok(), "invalid id {}", id);
        }
    }

    #[test]
    fn test_parse_valid_lowercase() {
        let input = "550e8400-e29b-41d4-a716-446655440000";
        let id = ImageId::parse(input).unwrap();
        assert_eq!(id.to_string(), input);
    }

    #[test]
    fn test_parse_preserves_uppercase() {
        let input = "550E8400-E29B-41D4-A716-446655440000";
        let id = ImageId::parse(input).unwrap();

        assert_eq!(id.to_string(), input);
        assert_ne!(
            id,
            ImageId::parse("550e8400-e29b-41d4-a716-446655440000").unwrap()
        );
    }

    #[test]
    fn test_parse_accepts_all_variant_nibbles() {
        for variant in ['8', '9', 'a', 'b', 'A', 'B'] {
            let input = format!("550e8400-e29b-41d4-{}716-446655440000", variant);
            assert!(ImageId::parse(&input).is_ok(), "rejected {}", input);
        }
    }

    #[test]
    fn test_parse_rejects_wrong_version() {
        let result = ImageId::parse("550e8400-e29b-11d4-a716-446655440000");
        assert!(matches!(result, Err(UuidError::InvalidFormat(_))));
    }

    #[test]
    fn test_parse_rejects_wrong_variant() {
        let result = ImageId::parse("550e8400-e29b-41d4-c716-446655440000");
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_rejects_simple_form() {
        let result = ImageId::parse("550e8400e29b41d4a716446655440000");
        match result {
            Err(UuidError::InvalidFormat(msg)) => {
                assert!(msg.contains("hyphenated version-4 UUID"));
            }
            _ => panic!("Expected InvalidFormat error"),
        }
    }

    #[test]
    fn test_parse_rejects_bad_lengths_and_characters() {
        assert!(ImageId::parse("").is_err());
        assert!(ImageId::parse("550e8400-e29b-41d4-a716-44665544000").is_err());
        assert!(ImageId::parse("550e8400-e29b-41d4-a716-4466554400000").is_err());
        assert!(ImageId::parse("550e8400-e29b-41d4-a716-44665544zzzz").is_err());
        assert!(ImageId::parse("550e8400-e29b-41d4-a716-446655440000-").is_err());
        assert!(ImageId::parse("not-a-uuid").is_err());
    }

    #[test]
    fn test_from_str_round_trip() {
        let original = ImageId::generate();
        let parsed: ImageId = original.to_string().parse().unwrap();
        assert_eq!(original, parsed);
    }

    #[test]
    fn test_parsed_id_matches_uuid_crate() {
        let id = ImageId::parse("550e8400-e29b-41d4-a716-446655440000").unwrap();
        assert_eq!(
            Uuid::parse_str(id.as_str()).unwrap().hyphenated().to_string(),
            "550e8400-e29b-41d4-a716-446655440000"
        );
    }

    #[test]
    fn test_serde_round_trip() {
        let id = ImageId::parse("550e8400-e29b-41d4-a716-446655440000").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"550e8400-e29b-41d4-a716-446655440000\"");

        let back: ImageId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_serde_rejects_invalid() {
        let result: Result<ImageId, _> = serde_json::from_str("\"abc\"");
        assert!(result.is_err());
    }
}
