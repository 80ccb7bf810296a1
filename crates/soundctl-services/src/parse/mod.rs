// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Text parsers for `pactl` and `bluetoothctl` output.

pub mod bluetoothctl;
pub mod pactl;

/// Value after `key` on a trimmed `Key: value` line.
fn field<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    line.strip_prefix(key)
        .and_then(|rest| rest.strip_prefix(':'))
        .map(str::trim)
}

fn yes(value: &str) -> bool {
    value.eq_ignore_ascii_case("yes")
}
