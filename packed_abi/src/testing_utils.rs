use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::address::Address;

pub(crate) fn common_setup() {
    // Try init since multiple tests calling `init` will cause an error.
    let _ = pretty_env_logger::try_init();
}

pub(crate) fn random_addresses(n: usize, seed: u64) -> Vec<Address> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_| Address::from(rng.gen::<[u8; 20]>())).collect()
}

pub(crate) fn random_bytes(len: usize, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len).map(|_| rng.gen()).collect()
}

/// Swaps the ASCII case of the character at byte index `i`.
pub(crate) fn flip_case_at(s: &str, i: usize) -> String {
    s.char_indices()
        .map(|(j, c)| match (j == i, c.is_ascii_uppercase()) {
            (false, _) => c,
            (true, true) => c.to_ascii_lowercase(),
            (true, false) => c.to_ascii_uppercase(),
        })
        .collect()
}
