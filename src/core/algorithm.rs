//! Registry of the supported JWS signature algorithms.
//!
//! A closed set of twelve algorithms: HMAC, RSASSA-PKCS1-v1_5, ECDSA and
//! RSASSA-PSS, each with a SHA-256, SHA-384 or SHA-512 digest.

use std::fmt;
use std::str::FromStr;

use crate::error::JwtCodecError;

/// Signature algorithm family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlgorithmFamily {
    /// HMAC with a shared secret.
    Hmac,
    /// RSASSA-PKCS1-v1_5.
    RsaPkcs1,
    /// ECDSA over the NIST P-curves.
    Ecdsa,
    /// RSASSA-PSS with MGF1.
    RsaPss,
}

impl AlgorithmFamily {
    /// Human-readable family name.
    pub fn description(self) -> &'static str {
        match self {
            Self::Hmac => "HMAC",
            Self::RsaPkcs1 => "RSASSA-PKCS1-v1_5",
            Self::Ecdsa => "ECDSA",
            Self::RsaPss => "RSASSA-PSS",
        }
    }
}

/// A JWS signature algorithm, identified on the wire by its `alg` name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureAlgorithm {
    /// HMAC using SHA-256.
    HS256,
    /// HMAC using SHA-384.
    HS384,
    /// HMAC using SHA-512.
    HS512,
    /// RSASSA-PKCS1-v1_5 using SHA-256.
    RS256,
    /// RSASSA-PKCS1-v1_5 using SHA-384.
    RS384,
    /// RSASSA-PKCS1-v1_5 using SHA-512.
    RS512,
    /// ECDSA using P-256 and SHA-256.
    ES256,
    /// ECDSA using P-384 and SHA-384.
    ES384,
    /// ECDSA using P-521 and SHA-512.
    ES512,
    /// RSASSA-PSS using SHA-256 and MGF1 with SHA-256.
    PS256,
    /// RSASSA-PSS using SHA-384 and MGF1 with SHA-384.
    PS384,
    /// RSASSA-PSS using SHA-512 and MGF1 with SHA-512.
    PS512,
}

impl SignatureAlgorithm {
    /// Every supported algorithm, in declaration order.
    pub const ALL: [Self; 12] = [
        Self::HS256,
        Self::HS384,
        Self::HS512,
        Self::RS256,
        Self::RS384,
        Self::RS512,
        Self::ES256,
        Self::ES384,
        Self::ES512,
        Self::PS256,
        Self::PS384,
        Self::PS512,
    ];

    /// The `alg` header value.
    pub fn short_name(self) -> &'static str {
        match self {
            Self::HS256 => "HS256",
            Self::HS384 => "HS384",
            Self::HS512 => "HS512",
            Self::RS256 => "RS256",
            Self::RS384 => "RS384",
            Self::RS512 => "RS512",
            Self::ES256 => "ES256",
            Self::ES384 => "ES384",
            Self::ES512 => "ES512",
            Self::PS256 => "PS256",
            Self::PS384 => "PS384",
            Self::PS512 => "PS512",
        }
    }

    pub fn family(self) -> AlgorithmFamily {
        match self {
            Self::HS256 | Self::HS384 | Self::HS512 => AlgorithmFamily::Hmac,
            Self::RS256 | Self::RS384 | Self::RS512 => AlgorithmFamily::RsaPkcs1,
            Self::ES256 | Self::ES384 | Self::ES512 => AlgorithmFamily::Ecdsa,
            Self::PS256 | Self::PS384 | Self::PS512 => AlgorithmFamily::RsaPss,
        }
    }

    /// Digest size in bits.
    pub fn digest_bits(self) -> u16 {
        match self {
            Self::HS256 | Self::RS256 | Self::ES256 | Self::PS256 => 256,
            Self::HS384 | Self::RS384 | Self::ES384 | Self::PS384 => 384,
            Self::HS512 | Self::RS512 | Self::ES512 | Self::PS512 => 512,
        }
    }

    /// Whether the algorithm signs with a private key and verifies with a
    /// public key rather than using a shared secret.
    pub fn is_asymmetric(self) -> bool {
        self.family() != AlgorithmFamily::Hmac
    }

    /// All algorithms ordered for display (lexicographic by short name).
    pub fn sorted_by_name() -> Vec<Self> {
        let mut all = Self::ALL.to_vec();
        all.sort_by_key(|alg| alg.short_name());
        all
    }

    /// Resolve a caller's algorithm choice, which may be absent.
    ///
    /// # Errors
    ///
    /// Returns [`JwtCodecError::InvalidAlgorithmChoice`] when nothing was
    /// selected or the name is not one of the supported algorithms.
    pub fn select(choice: Option<&str>) -> Result<Self, JwtCodecError> {
        match choice.map(str::trim) {
            None | Some("") => Err(JwtCodecError::InvalidAlgorithmChoice {
                reason: "no signature algorithm selected".to_string(),
            }),
            Some(name) => name.parse(),
        }
    }
}

impl fmt::Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

impl FromStr for SignatureAlgorithm {
    type Err = JwtCodecError;

    /// Parse an exact `alg` name such as `"HS256"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|alg| alg.short_name() == s)
            .ok_or_else(|| JwtCodecError::InvalidAlgorithmChoice {
                reason: format!(
                    "unsupported algorithm '{}' (expected one of {})",
                    s.escape_default(),
                    Self::sorted_by_name()
                        .iter()
                        .map(|alg| alg.short_name())
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_has_twelve_distinct_algorithms() {
        let names: std::collections::HashSet<_> = SignatureAlgorithm::ALL
            .iter()
            .map(|alg| alg.short_name())
            .collect();
        assert_eq!(names.len(), 12);
    }

    #[test]
    fn test_short_names_round_trip_through_from_str() {
        for alg in SignatureAlgorithm::ALL {
            assert_eq!(alg.short_name().parse::<SignatureAlgorithm>().unwrap(), alg);
            assert_eq!(alg.to_string(), alg.short_name());
        }
    }

    #[test]
    fn test_only_hmac_is_symmetric() {
        for alg in SignatureAlgorithm::ALL {
            assert_eq!(
                alg.is_asymmetric(),
                !alg.short_name().starts_with("HS"),
                "{alg}"
            );
        }
    }

    #[test]
    fn test_family_and_digest_match_short_name() {
        let cases = [
            ("HS", AlgorithmFamily::Hmac),
            ("RS", AlgorithmFamily::RsaPkcs1),
            ("ES", AlgorithmFamily::Ecdsa),
            ("PS", AlgorithmFamily::RsaPss),
        ];
        for alg in SignatureAlgorithm::ALL {
            let name = alg.short_name();
            let (_, family) = cases.iter().find(|(p, _)| name.starts_with(p)).unwrap();
            assert_eq!(alg.family(), *family);
            assert_eq!(alg.digest_bits().to_string(), &name[2..]);
        }
    }

    #[test]
    fn test_sorted_by_name_is_lexicographic() {
        let sorted: Vec<_> = SignatureAlgorithm::sorted_by_name()
            .into_iter()
            .map(|alg| alg.short_name())
            .collect();
        assert_eq!(
            sorted,
            [
                "ES256", "ES384", "ES512", "HS256", "HS384", "HS512", "PS256", "PS384", "PS512",
                "RS256", "RS384", "RS512"
            ]
        );
    }

    #[test]
    fn test_from_str_is_case_sensitive() {
        let err = "hs256".parse::<SignatureAlgorithm>().unwrap_err();
        assert!(matches!(err, JwtCodecError::InvalidAlgorithmChoice { .. }));
    }

    #[test]
    fn test_from_str_rejects_none() {
        let err = "none".parse::<SignatureAlgorithm>().unwrap_err();
        assert!(matches!(
            err,
            JwtCodecError::InvalidAlgorithmChoice { reason } if reason.contains("'none'")
        ));
    }

    #[test]
    fn test_select_without_choice_fails() {
        for choice in [None, Some(""), Some("   ")] {
            let err = SignatureAlgorithm::select(choice).unwrap_err();
            assert!(matches!(
                err,
                JwtCodecError::InvalidAlgorithmChoice { reason } if reason.contains("no signature algorithm")
            ));
        }
    }

    #[test]
    fn test_select_with_valid_choice() {
        assert_eq!(
            SignatureAlgorithm::select(Some(" PS384 ")).unwrap(),
            SignatureAlgorithm::PS384
        );
    }
}
