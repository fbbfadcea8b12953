//! Simple `local@domain.tld` address check
//!
//! Mirrors what an operator form accepts: no whitespace, exactly one `@`,
//! a non-empty local part and a dotted domain. Deliverability is not checked.

use contracts::RecipientQueue;

/// True when `candidate` looks like `local@domain.tld`
pub fn is_plausible_address(candidate: &str) -> bool {
    if candidate.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = candidate.split_once('@') else {
        return false;
    };

    if local.is_empty() || domain.contains('@') {
        return false;
    }

    // need at least one dot with something on both sides of it
    match domain.rsplit_once('.') {
        Some((head, tld)) => !head.is_empty() && !tld.is_empty(),
        None => false,
    }
}

/// Every queue entry failing [`is_plausible_address`], in queue order
pub fn invalid_recipients(queue: &RecipientQueue) -> Vec<String> {
    queue
        .iter()
        .filter(|r| !is_plausible_address(r))
        .map(|r| r.to_string())
        .collect()
}
