// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

/// Reports a broken compiler invariant and aborts the current compilation
/// by panicking.
#[macro_export]
macro_rules! bug {
    ($($arg:tt)*) => ({
        panic!("JITC internal error: {}! Aborting...", format!($($arg)*));
    });
}

#[cfg(test)]
mod tests {
    #[test]
    #[should_panic(expected = "JITC internal error: bad operand r3! Aborting...")]
    fn test_bug_reports_formatted_message() {
        let reg = 3;
        bug!("bad operand r{}", reg);
    }
}
