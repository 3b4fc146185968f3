//! Configuration parsing and validation.

use pretty_assertions::assert_eq;
use rv32hart_core::config::{Config, ConfigError};
use rv32hart_core::core::arch::fpr::FloatWidth;

#[test]
fn defaults_describe_an_unprivileged_hart() {
    let config = Config::default();
    assert!(!config.general.privileged);
    assert_eq!(config.general.max_cycles, None);
    assert_eq!(config.registers.flen, FloatWidth::F64);
    assert_eq!(config.memory.stack_size, 512 * 1024);
    assert_eq!(config.memory.load_alignment, 0x1000);
    assert_eq!(config.clock.tick_rate_hz, 1_000_000);
}

#[test]
fn partial_json_keeps_other_defaults() {
    let config = Config::from_json(
        r#"{
            "general": { "privileged": true, "max_cycles": 500 },
            "registers": { "flen": 32 },
            "hart": { "hart_id": 2 }
        }"#,
    )
    .unwrap();
    assert!(config.general.privileged);
    assert_eq!(config.general.max_cycles, Some(500));
    assert_eq!(config.registers.flen, FloatWidth::F32);
    assert_eq!(config.hart.hart_id, 2);
    assert_eq!(config.memory.load_alignment, 0x1000);
}

#[test]
fn unsupported_register_width_is_a_parse_error() {
    let err = Config::from_json(r#"{ "registers": { "flen": 48 } }"#).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)), "{err}");
}

#[test]
fn out_of_range_values_name_their_field() {
    let err = Config::from_json(r#"{ "memory": { "load_alignment": 3 } }"#).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::Invalid {
            field: "memory.load_alignment",
            ..
        }
    ));

    let err = Config::from_json(r#"{ "clock": { "tick_rate_hz": 0 } }"#).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::Invalid {
            field: "clock.tick_rate_hz",
            ..
        }
    ));

    let err = Config::from_json(r#"{ "memory": { "stack_size": 10 } }"#).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::Invalid {
            field: "memory.stack_size",
            ..
        }
    ));
}
