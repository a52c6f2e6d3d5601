// CLASSIFICATION: COMMUNITY
// Filename: tables/dm.rs v0.3
// Author: Lukas Bower
// Date Modified: 2027-07-26

//! Dynamic-mechanism scope endpoints: debug masks, ability bits, adaptivity.

use std::fmt::{self, Write};
use std::sync::atomic::Ordering;

use once_cell::sync::Lazy;

use crate::dispatch::ApplyOutcome;
use crate::parse;
use crate::state::{AdapterState, DmAbility};
use crate::table::{EndpointDescriptor, EndpointTable};

fn dump_dbg_comp(adapter: &AdapterState, out: &mut String) -> fmt::Result {
    writeln!(out, "dbg_comp: 0x{:016x}", adapter.dm.dbg_comp.load(Ordering::Relaxed))
}

fn apply_dbg_comp(adapter: &AdapterState, data: &[u8]) -> ApplyOutcome {
    let Some(mask) = parse::as_text(data).and_then(parse::first_hex_u64) else {
        return ApplyOutcome::Ignored;
    };
    adapter.dm.dbg_comp.store(mask, Ordering::Relaxed);
    ApplyOutcome::Applied
}

fn dump_dbg_level(adapter: &AdapterState, out: &mut String) -> fmt::Result {
    writeln!(out, "dbg_level: {}", adapter.dm.dbg_level.load(Ordering::Relaxed))
}

fn apply_dbg_level(adapter: &AdapterState, data: &[u8]) -> ApplyOutcome {
    let Some(level) = parse::as_text(data).and_then(parse::first_dec_u32) else {
        return ApplyOutcome::Ignored;
    };
    adapter.dm.dbg_level.store(level, Ordering::Relaxed);
    ApplyOutcome::Applied
}

fn dump_ability(adapter: &AdapterState, out: &mut String) -> fmt::Result {
    let ability = *adapter.dm.ability.lock().expect("poisoned ability lock");
    writeln!(out, "ability: 0x{:08x}", ability.bits())?;
    for (name, _flag) in ability.iter_names() {
        writeln!(out, "  {}", name)?;
    }
    Ok(())
}

fn apply_ability(adapter: &AdapterState, data: &[u8]) -> ApplyOutcome {
    let Some(bits) = parse::as_text(data).and_then(parse::first_hex_u32) else {
        return ApplyOutcome::Ignored;
    };
    // Unknown bits are dropped rather than rejected.
    *adapter.dm.ability.lock().expect("poisoned ability lock") =
        DmAbility::from_bits_truncate(bits);
    ApplyOutcome::Applied
}

#[cfg(feature = "adaptivity")]
fn dump_adaptivity(adapter: &AdapterState, out: &mut String) -> fmt::Result {
    let p = *adapter.dm.adaptivity.lock().expect("poisoned adaptivity lock");
    writeln!(out, "th_l2h_ini: 0x{:02x}", p.th_l2h_ini as u8)?;
    writeln!(out, "th_edcca_hl_diff: {}", p.th_edcca_hl_diff)?;
    writeln!(out, "igi_base: 0x{:02x}", p.igi_base as u8)?;
    writeln!(out, "force_edcca: {}", u8::from(p.force_edcca))?;
    writeln!(out, "adap_en_rssi: {}", p.adap_en_rssi)?;
    writeln!(out, "igi_lowerbound: {}", p.igi_lowerbound)
}

#[cfg(feature = "adaptivity")]
fn apply_adaptivity(adapter: &AdapterState, data: &[u8]) -> ApplyOutcome {
    let Some(params) = parse::as_text(data).and_then(parse::parse_adaptivity) else {
        return ApplyOutcome::Ignored;
    };
    *adapter.dm.adaptivity.lock().expect("poisoned adaptivity lock") = params;
    ApplyOutcome::Applied
}

/// Endpoints created with every interface's nested `dm` scope.
pub static DM_TABLE: Lazy<EndpointTable<AdapterState>> = Lazy::new(|| {
    #[allow(unused_mut)]
    let mut entries = vec![
        EndpointDescriptor::read_write("dbg_comp", dump_dbg_comp, apply_dbg_comp),
        EndpointDescriptor::read_write("dbg_level", dump_dbg_level, apply_dbg_level),
        EndpointDescriptor::read_write("ability", dump_ability, apply_ability),
    ];
    #[cfg(feature = "adaptivity")]
    entries.push(EndpointDescriptor::read_write(
        "adaptivity",
        dump_adaptivity,
        apply_adaptivity,
    ));
    EndpointTable::new(entries)
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ability_round_trip() {
        let adapter = AdapterState::new(0, 0);
        assert_eq!(apply_ability(&adapter, b"0x21"), ApplyOutcome::Applied);
        let ability = *adapter.dm.ability.lock().unwrap();
        assert_eq!(ability, DmAbility::DIG | DmAbility::ANT_DIV);
        let mut out = String::new();
        dump_ability(&adapter, &mut out).expect("dump");
        assert!(out.contains("ability: 0x00000021"));
        assert!(out.contains("DIG"));
        assert!(out.contains("ANT_DIV"));
    }

    #[test]
    fn dbg_masks_apply() {
        let adapter = AdapterState::new(0, 0);
        assert_eq!(apply_dbg_comp(&adapter, b"ffee0011aabb0099"), ApplyOutcome::Applied);
        assert_eq!(
            adapter.dm.dbg_comp.load(Ordering::Relaxed),
            0xffee_0011_aabb_0099
        );
        assert_eq!(apply_dbg_level(&adapter, b"5"), ApplyOutcome::Applied);
        assert_eq!(apply_dbg_level(&adapter, b"loud"), ApplyOutcome::Ignored);
        assert_eq!(adapter.dm.dbg_level.load(Ordering::Relaxed), 5);
    }

    #[cfg(feature = "adaptivity")]
    #[test]
    fn adaptivity_full_line_applies() {
        let adapter = AdapterState::new(0, 0);
        assert_eq!(
            apply_adaptivity(&adapter, b"f0 -7 2e 1 20 18"),
            ApplyOutcome::Applied
        );
        let p = *adapter.dm.adaptivity.lock().unwrap();
        assert_eq!(p.th_edcca_hl_diff, -7);
        assert!(p.force_edcca);
        // Wrong field count leaves parameters untouched.
        assert_eq!(apply_adaptivity(&adapter, b"f0 -7"), ApplyOutcome::Ignored);
        assert_eq!(adapter.dm.adaptivity.lock().unwrap().th_edcca_hl_diff, -7);
    }
}
