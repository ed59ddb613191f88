#![no_main]

use canonical_errors::{Canonical, Cause, Group};
use libfuzzer_sys::fuzz_target;

const LEAF: Canonical = Canonical::new("fuzz", "leaf", "leaf failure");

// Each byte is one instruction: push a leaf, push a foreign error, or nest
// the group built so far inside a fresh one.
fuzz_target!(|ops: Vec<u8>| {
    let mut group = Group::new();
    let mut expected = 0usize;

    for op in ops {
        match op % 3 {
            0 => {
                group.push(LEAF);
                expected += 1;
            }
            1 => {
                group.push(format!("foreign {}", op));
                expected += 1;
            }
            _ => {
                let mut outer = Group::new();
                outer.push(group);
                group = outer;
            }
        }
    }

    assert_eq!(group.len(), expected);
    assert!(group.iter().all(|member| !matches!(member.cause(), Some(Cause::Aggregate(_)))));
    let _ = group.to_string();
});
