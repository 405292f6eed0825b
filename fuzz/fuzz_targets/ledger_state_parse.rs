#![no_main]

use heritage_core::LedgerState;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };

    // A state file that loads must have consistent indices,
    // and re-serializing it must load back to the same state.
    if let Ok(state) = LedgerState::from_json(s) {
        assert!(state.testaments.check_consistency().is_ok());
        let json = serde_json::to_string(&state).expect("loaded state serializes");
        let reloaded = LedgerState::from_json(&json).expect("serialized state reloads");
        assert_eq!(reloaded, state);
    }
});
