//! Prefix-free label generation (§4.1).
//!
//! Greedy level-distribution: at each label length, emit just enough labels
//! to keep the average length minimal while guaranteeing the remaining
//! slots can still expand to cover whatever count is left.

use neru_events::NeruError;

/// Labels never exceed this length; `generate` rejects counts this can't cover.
const MAX_LABEL_LEN: u32 = 3;

/// Produce `count` prefix-free uppercase labels drawn from `characters`,
/// shorter labels first, then base-N enumeration order within a length.
pub fn generate(characters: &str, count: usize) -> Result<Vec<String>, NeruError> {
    let chars: Vec<char> = characters.chars().map(|c| c.to_ascii_uppercase()).collect();
    let n = chars.len();
    if n < 2 {
        return Err(NeruError::InvalidInput(format!(
            "label alphabet must have at least 2 characters, got {n}"
        )));
    }

    let capacity = (n as u128).pow(MAX_LABEL_LEN);
    if count as u128 > capacity {
        return Err(NeruError::CapacityExceeded {
            requested: count,
            capacity: capacity.min(usize::MAX as u128) as usize,
        });
    }

    if count == 0 {
        return Ok(Vec::new());
    }

    let mut labels = Vec::with_capacity(count);
    let mut remaining = count;
    let mut prefixes: Vec<String> = chars.iter().map(|c| c.to_string()).collect();

    loop {
        let slots = prefixes.len();
        let keep = if slots >= remaining {
            remaining
        } else if slots.saturating_mul(n) < remaining {
            0
        } else {
            (slots * n - remaining) / (n - 1)
        };

        labels.extend(prefixes.drain(..keep));
        remaining -= keep;
        if remaining == 0 {
            break;
        }

        let mut next = Vec::with_capacity(prefixes.len() * n);
        for p in prefixes.drain(..) {
            for c in &chars {
                let mut child = p.clone();
                child.push(*c);
                next.push(child);
            }
        }
        prefixes = next;
    }

    tracing::trace!(
        target: "labels.generate",
        alphabet_size = n,
        count,
        "generated prefix-free labels"
    );
    Ok(labels)
}

/// True iff no label in `labels` is a proper prefix of another.
pub fn is_prefix_free(labels: &[String]) -> bool {
    for (i, a) in labels.iter().enumerate() {
        for (j, b) in labels.iter().enumerate() {
            if i != j && b.starts_with(a.as_str()) && b != a {
                return false;
            }
        }
    }
    true
}
