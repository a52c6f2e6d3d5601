// CLASSIFICATION: COMMUNITY
// Filename: tables/driver.rs v0.2
// Author: Lukas Bower
// Date Modified: 2027-07-26

//! Driver-scope endpoints: version, log level, optional memory accounting.

use std::fmt::{self, Write};
use std::sync::atomic::Ordering;

use once_cell::sync::Lazy;

use crate::dispatch::ApplyOutcome;
use crate::parse;
use crate::state::DriverState;
use crate::table::{EndpointDescriptor, EndpointTable};

fn dump_ver_info(drv: &DriverState, out: &mut String) -> fmt::Result {
    writeln!(out, "{}", drv.version)
}

fn dump_log_level(drv: &DriverState, out: &mut String) -> fmt::Result {
    writeln!(out, "log_level: {}", drv.log_level.load(Ordering::Relaxed))
}

fn apply_log_level(drv: &DriverState, data: &[u8]) -> ApplyOutcome {
    let Some(level) = parse::as_text(data).and_then(parse::first_dec_u32) else {
        return ApplyOutcome::Ignored;
    };
    let Ok(level) = u8::try_from(level) else {
        return ApplyOutcome::Ignored;
    };
    if drv.set_log_level(level) {
        log::info!("driver log level set to {}", level);
        ApplyOutcome::Applied
    } else {
        ApplyOutcome::Ignored
    }
}

#[cfg(feature = "mstat")]
fn dump_mstat(drv: &DriverState, out: &mut String) -> fmt::Result {
    writeln!(
        out,
        "alloc_cnt: {}",
        drv.mem.alloc_cnt.load(Ordering::Relaxed)
    )?;
    writeln!(
        out,
        "alloc_bytes: {}",
        drv.mem.alloc_bytes.load(Ordering::Relaxed)
    )?;
    writeln!(
        out,
        "peak_bytes: {}",
        drv.mem.peak_bytes.load(Ordering::Relaxed)
    )
}

/// Endpoints created with the driver scope at registry init.
pub static DRIVER_TABLE: Lazy<EndpointTable<DriverState>> = Lazy::new(|| {
    #[allow(unused_mut)]
    let mut entries = vec![
        EndpointDescriptor::read_only("ver_info", dump_ver_info),
        EndpointDescriptor::read_write("log_level", dump_log_level, apply_log_level),
    ];
    #[cfg(feature = "mstat")]
    entries.push(EndpointDescriptor::read_only("mstat", dump_mstat));
    EndpointTable::new(entries)
});

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::Ordering;

    #[test]
    fn log_level_apply_respects_range() {
        let drv = DriverState::new("diagfs v0.1 test");
        assert_eq!(apply_log_level(&drv, b"6"), ApplyOutcome::Applied);
        assert_eq!(drv.log_level.load(Ordering::Relaxed), 6);
        assert_eq!(apply_log_level(&drv, b"42"), ApplyOutcome::Ignored);
        assert_eq!(drv.log_level.load(Ordering::Relaxed), 6);
        assert_eq!(apply_log_level(&drv, b"high"), ApplyOutcome::Ignored);
    }

    #[test]
    fn ver_info_reports_version() {
        let drv = DriverState::new("diagfs v0.1 test");
        let mut out = String::new();
        dump_ver_info(&drv, &mut out).expect("dump");
        assert_eq!(out, "diagfs v0.1 test\n");
    }
}
