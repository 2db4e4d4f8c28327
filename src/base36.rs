// Copyright (c) 2025 Kodama Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Kokic (@kokic)

const BASE36_CHARS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Encode `num` as lowercase base-36 without leading zeros.
pub fn u64_to_base36(mut num: u64) -> String {
    if num == 0 {
        return "0".to_string();
    }

    let mut digits = Vec::with_capacity(13);
    while num > 0 {
        digits.push(BASE36_CHARS[(num % 36) as usize]);
        num /= 36;
    }
    digits.reverse();

    digits.into_iter().map(char::from).collect()
}

/// A random identifier in base-36, used for rules submitted without an `id`.
pub fn random_id() -> String {
    u64_to_base36(fastrand::u64(..))
}
