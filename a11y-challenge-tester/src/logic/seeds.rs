use a11y_challenge_game::{decode_seed_code, replay_code};
use a11y_challenge_game::seed::WORD_LIST;
use anyhow::{Context, Result, bail};
use std::collections::HashMap;

fn looks_like_seed_code(token: &str) -> bool {
    regex::Regex::new(r"^(?i)AX-[A-Z]+\d{2}$")
        .map(|re| re.is_match(token))
        .unwrap_or(false)
}

/// Seed plus the code it was entered as, if any.
#[derive(Debug, Clone)]
pub struct SeedInfo {
    pub seed: u64,
    pub code: Option<String>,
}

impl SeedInfo {
    #[must_use]
    pub fn from_numeric(seed: u64) -> Self {
        Self { seed, code: None }
    }

    #[must_use]
    pub fn from_code(seed: u64, code: String) -> Self {
        Self {
            seed,
            code: Some(code),
        }
    }

    /// Code to print for replaying this seed; `None` when no code decodes to it.
    #[must_use]
    pub fn display_code(&self) -> Option<String> {
        self.code
            .clone()
            .or_else(|| replay_code(self.seed))
    }
}

/// Resolve CLI seed arguments into canonical seeds.
///
/// Accepts integers, seed codes, and `all`, which expands to every code.
pub fn resolve_seed_inputs(tokens: &[String]) -> Result<Vec<SeedInfo>> {
    let mut pending: Vec<SeedInfo> = Vec::new();
    let mut request_all = false;

    for token in tokens {
        if token.is_empty() {
            continue;
        }
        if token.eq_ignore_ascii_case("all") {
            request_all = true;
            continue;
        }
        if let Ok(value) = token.parse::<i64>() {
            pending.push(SeedInfo::from_numeric(value.unsigned_abs()));
            continue;
        }
        if let Ok(value) = token.parse::<u64>() {
            pending.push(SeedInfo::from_numeric(value));
            continue;
        }
        if looks_like_seed_code(token) {
            let seed = decode_code_checked(token)?;
            pending.push(SeedInfo::from_code(seed, token.to_uppercase()));
            continue;
        }
        bail!("Unrecognized seed token: {token}");
    }

    if request_all {
        pending.extend(generate_all_code_seeds()?);
    }

    let mut deduped: Vec<SeedInfo> = Vec::new();
    let mut index: HashMap<u64, usize> = HashMap::new();
    for info in pending {
        if let Some(&existing) = index.get(&info.seed) {
            if deduped[existing].code.is_none() && info.code.is_some() {
                deduped[existing] = info;
            }
        } else {
            index.insert(info.seed, deduped.len());
            deduped.push(info);
        }
    }

    if deduped.is_empty() {
        deduped.push(SeedInfo::from_numeric(1337));
    }
    Ok(deduped)
}

fn generate_all_code_seeds() -> Result<Vec<SeedInfo>> {
    let mut seeds = Vec::with_capacity(WORD_LIST.len() * 100);
    for word in WORD_LIST {
        for suffix in 0..100 {
            let code = format!("AX-{word}{suffix:02}");
            let seed = decode_code_checked(&code)?;
            seeds.push(SeedInfo::from_code(seed, code));
        }
    }
    Ok(seeds)
}

fn decode_code_checked(code: &str) -> Result<u64> {
    decode_seed_code(code).with_context(|| format!("failed to parse seed code: {code}"))
}
