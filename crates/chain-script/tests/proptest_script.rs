use proptest::prelude::*;

use chain_script::interpreter::parsed_opcode::{disasm_string, parse_script, unparse};
use chain_script::interpreter::{Engine, ScriptFlags, ScriptNumber};
use chain_script::Script;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn script_number_decodes_what_it_encodes(val in any::<i64>()) {
        let sn = ScriptNumber::from(val);
        let sn2 = ScriptNumber::decode(&sn.encode(), 9, true).unwrap();
        prop_assert_eq!(sn2.clamp_i64(), val);
    }

    #[test]
    fn decoder_never_panics(data in prop::collection::vec(any::<u8>(), 0..512)) {
        let _ = parse_script(&data);
        let (_, err) = disasm_string(&data, true);
        prop_assert_eq!(err.is_some(), parse_script(&data).is_err());
    }

    #[test]
    fn decoded_scripts_reencode_exactly(data in prop::collection::vec(any::<u8>(), 0..512)) {
        if let Ok(pops) = parse_script(&data) {
            prop_assert_eq!(unparse(&pops).unwrap(), data);
        }
    }

    #[test]
    fn full_disasm_reassembles(data in prop::collection::vec(any::<u8>(), 0..256)) {
        let script = Script::from_bytes(&data);
        if let Ok(asm) = script.disasm(false) {
            // Unknown bytes have no assembler name.
            if !asm.contains("OP_UNKNOWN") {
                prop_assert_eq!(Script::from_asm(&asm).unwrap(), script);
            }
        }
    }

    #[test]
    fn disasm_is_deterministic(data in prop::collection::vec(any::<u8>(), 0..256)) {
        prop_assert_eq!(disasm_string(&data, true), disasm_string(&data, true));
        prop_assert_eq!(disasm_string(&data, false), disasm_string(&data, false));
    }

    #[test]
    fn engine_never_panics(
        witness in prop::collection::vec(any::<u8>(), 0..64),
        program in prop::collection::vec(any::<u8>(), 0..64),
        version in 0u32..4,
    ) {
        let _ = Engine::new().execute(
            &Script::from_bytes(&witness),
            &Script::from_bytes(&program),
            version,
            ScriptFlags::NONE,
            None,
        );
    }
}
