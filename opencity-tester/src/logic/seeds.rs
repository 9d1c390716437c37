use anyhow::{Result, bail};
use std::collections::HashSet;

/// Seed metadata used for logic runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedInfo {
    pub seed: u64,
    /// The token the seed was parsed from.
    pub token: String,
}

impl SeedInfo {
    #[must_use]
    pub fn from_numeric(seed: u64) -> Self {
        Self {
            seed,
            token: seed.to_string(),
        }
    }
}

pub const DEFAULT_SEED: u64 = 1337;

/// Resolve a list of CLI seed arguments into canonical seeds.
///
/// Accepts decimal integers; negative values use their magnitude. Duplicates
/// keep their first position. An empty list yields [`DEFAULT_SEED`].
pub fn resolve_seed_inputs(tokens: &[String]) -> Result<Vec<SeedInfo>> {
    let mut seen: HashSet<u64> = HashSet::new();
    let mut resolved: Vec<SeedInfo> = Vec::new();

    for token in tokens {
        if token.is_empty() {
            continue;
        }

        let seed = if let Ok(value) = token.parse::<i64>() {
            value.unsigned_abs()
        } else if let Ok(value) = token.parse::<u64>() {
            value
        } else {
            bail!("Unrecognized seed token: {token}");
        };

        if seen.insert(seed) {
            resolved.push(SeedInfo {
                seed,
                token: token.clone(),
            });
        }
    }

    if resolved.is_empty() {
        resolved.push(SeedInfo::from_numeric(DEFAULT_SEED));
    }

    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(raw: &[&str]) -> Vec<String> {
        raw.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn resolves_numeric_and_negative() {
        let seeds = resolve_seed_inputs(&tokens(&["42", "-7", "18446744073709551615"])).unwrap();
        let values: Vec<u64> = seeds.iter().map(|s| s.seed).collect();
        assert_eq!(values, [42, 7, u64::MAX]);
        assert_eq!(seeds[1].token, "-7");
    }

    #[test]
    fn dedupes_preserving_first() {
        let seeds = resolve_seed_inputs(&tokens(&["5", "-5", "6", "5"])).unwrap();
        let values: Vec<u64> = seeds.iter().map(|s| s.seed).collect();
        assert_eq!(values, [5, 6]);
        assert_eq!(seeds[0].token, "5");
    }

    #[test]
    fn empty_input_defaults() {
        let seeds = resolve_seed_inputs(&[]).unwrap();
        assert_eq!(seeds, vec![SeedInfo::from_numeric(DEFAULT_SEED)]);
    }

    #[test]
    fn rejects_non_numeric_tokens() {
        let err = resolve_seed_inputs(&tokens(&["12", "banana"])).unwrap_err();
        assert!(err.to_string().contains("banana"));
    }
}
