// CLASSIFICATION: COMMUNITY
// Filename: tables/adapter.rs v0.4
// Author: Lukas Bower
// Date Modified: 2027-08-02

//! Interface-scope endpoints: register access, security state, rx/trx
//! counters, CAM cache, signal and tunable toggles.

use std::fmt::{self, Write};
use std::sync::atomic::Ordering;

use once_cell::sync::Lazy;

use super::dump_none;
use crate::dispatch::ApplyOutcome;
use crate::parse::{self, CamCommand};
use crate::state::AdapterState;
use crate::table::{EndpointDescriptor, EndpointTable};

// Register window ranges for the three dump endpoints.
const MAC_REGS: std::ops::Range<u32> = 0x000..0x800;
const BB_REGS: std::ops::Range<u32> = 0x800..0x1000;
const RF_REGS: std::ops::Range<u32> = 0x1000..0x2000;

fn apply_write_reg(adapter: &AdapterState, data: &[u8]) -> ApplyOutcome {
    let Some((addr, value)) = parse::as_text(data).and_then(parse::parse_reg_write) else {
        return ApplyOutcome::Ignored;
    };
    adapter.poke_reg(addr, value);
    ApplyOutcome::Applied
}

fn dump_read_reg(adapter: &AdapterState, out: &mut String) -> fmt::Result {
    let addr = adapter.reg_read_addr.load(Ordering::Relaxed);
    writeln!(out, "0x{:04x}: 0x{:08x}", addr, adapter.peek_reg(addr))
}

fn apply_read_reg(adapter: &AdapterState, data: &[u8]) -> ApplyOutcome {
    let Some(addr) = parse::as_text(data).and_then(parse::first_hex_u32) else {
        return ApplyOutcome::Ignored;
    };
    adapter.reg_read_addr.store(addr, Ordering::Relaxed);
    ApplyOutcome::Applied
}

fn dump_fwstate(adapter: &AdapterState, out: &mut String) -> fmt::Result {
    writeln!(out, "fwstate=0x{:x}", adapter.fw_state.load(Ordering::Relaxed))
}

fn dump_sec_info(adapter: &AdapterState, out: &mut String) -> fmt::Result {
    let sec = adapter.sec.lock().expect("poisoned sec lock");
    writeln!(out, "auth_alg=0x{:x}, enc_alg=0x{:x}", sec.auth_alg, sec.enc_alg)?;
    writeln!(out, "hw_decrypted={}", u8::from(sec.hw_decrypted))
}

fn dump_mlmext_state(adapter: &AdapterState, out: &mut String) -> fmt::Result {
    writeln!(
        out,
        "mlmext_state=0x{:08x}",
        adapter.mlme_state.load(Ordering::Relaxed)
    )
}

fn dump_qos_option(adapter: &AdapterState, out: &mut String) -> fmt::Result {
    writeln!(out, "qos_option={}", adapter.qos_option.load(Ordering::Relaxed))
}

fn dump_ht_option(adapter: &AdapterState, out: &mut String) -> fmt::Result {
    writeln!(out, "ht_option={}", adapter.ht_option.load(Ordering::Relaxed))
}

fn dump_adapter_state(adapter: &AdapterState, out: &mut String) -> fmt::Result {
    writeln!(
        out,
        "surprise_removed={}, driver_stopped={}",
        adapter.surprise_removed.load(Ordering::Relaxed),
        adapter.driver_stopped.load(Ordering::Relaxed)
    )
}

fn dump_path_rssi(adapter: &AdapterState, out: &mut String) -> fmt::Result {
    let signal = adapter.signal.lock().expect("poisoned signal lock");
    writeln!(out, "rssi_a={}", signal.rssi_a)?;
    writeln!(out, "rssi_b={}", signal.rssi_b)
}

fn dump_trx_info(adapter: &AdapterState, out: &mut String) -> fmt::Result {
    writeln!(
        out,
        "tx_pkts={}, tx_drop={}",
        adapter.trx.tx_pkts.load(Ordering::Relaxed),
        adapter.trx.tx_drop.load(Ordering::Relaxed)
    )?;
    writeln!(
        out,
        "rx_pkts={}, rx_drop={}",
        adapter.trx.rx_pkts.load(Ordering::Relaxed),
        adapter.trx.rx_drop.load(Ordering::Relaxed)
    )
}

fn dump_rx_info(adapter: &AdapterState, out: &mut String) -> fmt::Result {
    let rx = adapter.rx.lock().expect("poisoned rx lock");
    writeln!(
        out,
        "Counts of Packets Whose Seq_Num Less Than Reorder Control Seq_Num: {}",
        rx.ampdu_drop
    )?;
    writeln!(out, "Rx Reorder Time-out Trigger Counts: {}", rx.ampdu_forced_indicate)?;
    writeln!(out, "Rx Packet Loss Counts: {}", rx.ampdu_loss)?;
    writeln!(out, "Duplicate Management Frame Drop Count: {}", rx.dup_mgt_drop)?;
    writeln!(out, "AMPDU BA window shift Count: {}", rx.ba_window_shift)
}

fn apply_rx_info(adapter: &AdapterState, data: &[u8]) -> ApplyOutcome {
    // Only a `0` in the first byte resets the counter block.
    match parse::as_text(data) {
        Some(text) if text.starts_with('0') => {
            adapter.rx.lock().expect("poisoned rx lock").reset();
            ApplyOutcome::Applied
        }
        _ => ApplyOutcome::Ignored,
    }
}

fn dump_wifi_spec(adapter: &AdapterState, out: &mut String) -> fmt::Result {
    writeln!(out, "wifi_spec={}", adapter.wifi_spec)
}

fn apply_cam(adapter: &AdapterState, data: &[u8]) -> ApplyOutcome {
    let Some(cmd) = parse::as_text(data).and_then(CamCommand::parse) else {
        return ApplyOutcome::Ignored;
    };
    match cmd {
        CamCommand::Clear(id) => {
            adapter
                .cam
                .lock()
                .expect("poisoned cam lock")
                .clear(id as usize);
            // TX falls back to software encryption until rekeyed.
            adapter.sec.lock().expect("poisoned sec lock").hw_decrypted = false;
            ApplyOutcome::Applied
        }
        CamCommand::WriteFromCache(id) => {
            let mut cam = adapter.cam.lock().expect("poisoned cam lock");
            if (id as usize) < crate::state::CAM_ENTRIES && cam.entries[id as usize].ctrl != 0 {
                cam.bitmap |= 1 << id;
                ApplyOutcome::Applied
            } else {
                ApplyOutcome::Ignored
            }
        }
    }
}

fn hex_bytes(out: &mut String, bytes: &[u8]) -> fmt::Result {
    for b in bytes {
        write!(out, "{:02x}", b)?;
    }
    Ok(())
}

fn dump_cam_cache(adapter: &AdapterState, out: &mut String) -> fmt::Result {
    let cam = adapter.cam.lock().expect("poisoned cam lock");
    writeln!(out, "cam bitmap:0x{:016x}", cam.bitmap)?;
    writeln!(out, "{:<2} {:<6} {:<17} {:<32} {:<3}", "id", "ctrl", "addr", "key", "kid")?;
    for (id, entry) in cam.entries.iter().enumerate() {
        if entry.ctrl == 0 {
            continue;
        }
        write!(
            out,
            "{:2} 0x{:04x} {:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x} ",
            id,
            entry.ctrl,
            entry.mac[0],
            entry.mac[1],
            entry.mac[2],
            entry.mac[3],
            entry.mac[4],
            entry.mac[5],
        )?;
        hex_bytes(out, &entry.key)?;
        writeln!(out, " {:3}", entry.ctrl & 0x03)?;
    }
    Ok(())
}

fn dump_rate_ctl(adapter: &AdapterState, out: &mut String) -> fmt::Result {
    match adapter.rate_ctl.lock().expect("poisoned rate_ctl lock").fixed_rate {
        Some(rate) => writeln!(out, "rate_ctl: fixed 0x{:02x}", rate),
        None => writeln!(out, "rate_ctl: auto"),
    }
}

fn apply_rate_ctl(adapter: &AdapterState, data: &[u8]) -> ApplyOutcome {
    let Some(rate) = parse::as_text(data).and_then(parse::first_hex_u32) else {
        return ApplyOutcome::Ignored;
    };
    let Ok(rate) = u8::try_from(rate) else {
        return ApplyOutcome::Ignored;
    };
    let mut ctl = adapter.rate_ctl.lock().expect("poisoned rate_ctl lock");
    // 0xff restores automatic rate selection.
    ctl.fixed_rate = if rate == 0xff { None } else { Some(rate) };
    ApplyOutcome::Applied
}

fn dump_reg_range(
    adapter: &AdapterState,
    out: &mut String,
    label: &str,
    range: std::ops::Range<u32>,
) -> fmt::Result {
    writeln!(out, "======= {} =======", label)?;
    let regs = adapter.regs.lock().expect("poisoned regs lock");
    for (addr, value) in regs.range(range) {
        writeln!(out, "0x{:04x} 0x{:08x}", addr, value)?;
    }
    Ok(())
}

fn dump_mac_regs(adapter: &AdapterState, out: &mut String) -> fmt::Result {
    dump_reg_range(adapter, out, "MAC REG", MAC_REGS)
}

fn dump_bb_regs(adapter: &AdapterState, out: &mut String) -> fmt::Result {
    dump_reg_range(adapter, out, "BB REG", BB_REGS)
}

fn dump_rf_regs(adapter: &AdapterState, out: &mut String) -> fmt::Result {
    dump_reg_range(adapter, out, "RF REG", RF_REGS)
}

fn dump_rx_signal(adapter: &AdapterState, out: &mut String) -> fmt::Result {
    let signal = adapter.signal.lock().expect("poisoned signal lock");
    writeln!(out, "signal_strength: {}", signal.strength)?;
    writeln!(out, "signal_qual: {}", signal.quality)?;
    writeln!(out, "rssi_a: {}", signal.rssi_a)?;
    writeln!(out, "rssi_b: {}", signal.rssi_b)
}

fn apply_rx_signal(adapter: &AdapterState, data: &[u8]) -> ApplyOutcome {
    let Some(text) = parse::as_text(data) else {
        return ApplyOutcome::Ignored;
    };
    let fields = parse::fields(text);
    if fields.len() < 2 {
        return ApplyOutcome::Ignored;
    }
    let (Some(strength), Some(quality)) =
        (parse::dec_u8(fields[0]), parse::dec_u8(fields[1]))
    else {
        return ApplyOutcome::Ignored;
    };
    let mut signal = adapter.signal.lock().expect("poisoned signal lock");
    signal.strength = strength;
    signal.quality = quality;
    ApplyOutcome::Applied
}

fn dump_ht_enable(adapter: &AdapterState, out: &mut String) -> fmt::Result {
    writeln!(out, "{}", adapter.ht_enable.load(Ordering::Relaxed))
}

fn apply_ht_enable(adapter: &AdapterState, data: &[u8]) -> ApplyOutcome {
    apply_bool_toggle(&adapter.ht_enable, data)
}

fn dump_cbw40_enable(adapter: &AdapterState, out: &mut String) -> fmt::Result {
    writeln!(out, "{}", adapter.cbw40_enable.load(Ordering::Relaxed))
}

fn apply_cbw40_enable(adapter: &AdapterState, data: &[u8]) -> ApplyOutcome {
    apply_bool_toggle(&adapter.cbw40_enable, data)
}

fn dump_ampdu_enable(adapter: &AdapterState, out: &mut String) -> fmt::Result {
    writeln!(out, "{}", adapter.ampdu_enable.load(Ordering::Relaxed))
}

fn apply_ampdu_enable(adapter: &AdapterState, data: &[u8]) -> ApplyOutcome {
    apply_bool_toggle(&adapter.ampdu_enable, data)
}

fn apply_bool_toggle(slot: &std::sync::atomic::AtomicU8, data: &[u8]) -> ApplyOutcome {
    let Some(value) = parse::as_text(data).and_then(parse::first_dec_u32) else {
        return ApplyOutcome::Ignored;
    };
    slot.store(u8::from(value != 0), Ordering::Relaxed);
    ApplyOutcome::Applied
}

fn dump_rx_stbc(adapter: &AdapterState, out: &mut String) -> fmt::Result {
    writeln!(out, "{}", adapter.rx_stbc.load(Ordering::Relaxed))
}

fn apply_rx_stbc(adapter: &AdapterState, data: &[u8]) -> ApplyOutcome {
    let Some(value) = parse::as_text(data).and_then(parse::first_dec_u32) else {
        return ApplyOutcome::Ignored;
    };
    // 0=off, 1=1SS, 2=2SS, 3=both; anything else is not a mode.
    if value > 3 {
        return ApplyOutcome::Ignored;
    }
    adapter.rx_stbc.store(value as u8, Ordering::Relaxed);
    ApplyOutcome::Applied
}

fn dump_rssi_disp(adapter: &AdapterState, out: &mut String) -> fmt::Result {
    let signal = adapter.signal.lock().expect("poisoned signal lock");
    writeln!(out, "rssi_disp: {}", u8::from(signal.disp))
}

fn apply_rssi_disp(adapter: &AdapterState, data: &[u8]) -> ApplyOutcome {
    let Some(value) = parse::as_text(data).and_then(parse::first_dec_u32) else {
        return ApplyOutcome::Ignored;
    };
    adapter.signal.lock().expect("poisoned signal lock").disp = value != 0;
    ApplyOutcome::Applied
}

fn dump_vid(adapter: &AdapterState, out: &mut String) -> fmt::Result {
    writeln!(out, "0x{:04x}", adapter.vid)
}

fn dump_pid(adapter: &AdapterState, out: &mut String) -> fmt::Result {
    writeln!(out, "0x{:04x}", adapter.pid)
}

#[cfg(feature = "ap-mode")]
fn dump_all_sta_info(adapter: &AdapterState, out: &mut String) -> fmt::Result {
    let stations = adapter.stations.lock().expect("poisoned stations lock");
    writeln!(out, "sta_count={}", stations.len())?;
    for sta in stations.iter() {
        writeln!(
            out,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x} aid={} tx_pkts={} rx_pkts={}",
            sta.mac[0], sta.mac[1], sta.mac[2], sta.mac[3], sta.mac[4], sta.mac[5],
            sta.aid, sta.tx_pkts, sta.rx_pkts
        )?;
    }
    Ok(())
}

#[cfg(feature = "roam")]
fn dump_roam_flags(adapter: &AdapterState, out: &mut String) -> fmt::Result {
    let roam = adapter.roam.lock().expect("poisoned roam lock");
    writeln!(out, "0x{:02x}", roam.flags)
}

#[cfg(feature = "roam")]
fn apply_roam_flags(adapter: &AdapterState, data: &[u8]) -> ApplyOutcome {
    let Some(flags) = parse::as_text(data).and_then(parse::first_hex_u32) else {
        return ApplyOutcome::Ignored;
    };
    let Ok(flags) = u8::try_from(flags) else {
        return ApplyOutcome::Ignored;
    };
    adapter.roam.lock().expect("poisoned roam lock").flags = flags;
    ApplyOutcome::Applied
}

#[cfg(feature = "roam")]
fn dump_roam_param(adapter: &AdapterState, out: &mut String) -> fmt::Result {
    let roam = adapter.roam.lock().expect("poisoned roam lock");
    writeln!(out, "rssi_diff_th={} scan_int_ms={}", roam.rssi_diff_th, roam.scan_int_ms)
}

#[cfg(feature = "roam")]
fn apply_roam_param(adapter: &AdapterState, data: &[u8]) -> ApplyOutcome {
    let Some(text) = parse::as_text(data) else {
        return ApplyOutcome::Ignored;
    };
    let fields = parse::fields(text);
    if fields.len() < 2 {
        return ApplyOutcome::Ignored;
    }
    let (Some(rssi_diff_th), Some(scan_int_ms)) =
        (parse::dec_u8(fields[0]), parse::dec_u32(fields[1]))
    else {
        return ApplyOutcome::Ignored;
    };
    let mut roam = adapter.roam.lock().expect("poisoned roam lock");
    roam.rssi_diff_th = rssi_diff_th;
    roam.scan_int_ms = scan_int_ms;
    ApplyOutcome::Applied
}

#[cfg(feature = "roam")]
fn apply_roam_tgt_addr(adapter: &AdapterState, data: &[u8]) -> ApplyOutcome {
    let Some(mac) = parse::as_text(data)
        .map(str::trim)
        .and_then(parse::parse_mac)
    else {
        return ApplyOutcome::Ignored;
    };
    adapter.roam.lock().expect("poisoned roam lock").tgt_addr = mac;
    ApplyOutcome::Applied
}

/// Endpoints created with every interface scope.
pub static ADAPTER_TABLE: Lazy<EndpointTable<AdapterState>> = Lazy::new(|| {
    #[allow(unused_mut)]
    let mut entries = vec![
        EndpointDescriptor::read_write("write_reg", dump_none, apply_write_reg),
        EndpointDescriptor::read_write("read_reg", dump_read_reg, apply_read_reg),
        EndpointDescriptor::read_only("fwstate", dump_fwstate),
        EndpointDescriptor::read_only("sec_info", dump_sec_info),
        EndpointDescriptor::read_only("mlmext_state", dump_mlmext_state),
        EndpointDescriptor::read_only("qos_option", dump_qos_option),
        EndpointDescriptor::read_only("ht_option", dump_ht_option),
        EndpointDescriptor::read_only("adapter_state", dump_adapter_state),
        EndpointDescriptor::read_only("trx_info", dump_trx_info),
        EndpointDescriptor::read_write("rx_info", dump_rx_info, apply_rx_info),
        EndpointDescriptor::read_only("wifi_spec", dump_wifi_spec),
        EndpointDescriptor::read_write("cam", dump_none, apply_cam),
        EndpointDescriptor::read_only("cam_cache", dump_cam_cache),
        EndpointDescriptor::read_write("rate_ctl", dump_rate_ctl, apply_rate_ctl),
        EndpointDescriptor::read_only("mac_reg_dump", dump_mac_regs),
        EndpointDescriptor::read_only("bb_reg_dump", dump_bb_regs),
        EndpointDescriptor::read_only("rf_reg_dump", dump_rf_regs),
        EndpointDescriptor::read_write("rx_signal", dump_rx_signal, apply_rx_signal),
        EndpointDescriptor::read_write("ht_enable", dump_ht_enable, apply_ht_enable),
        EndpointDescriptor::read_write("cbw40_enable", dump_cbw40_enable, apply_cbw40_enable),
        EndpointDescriptor::read_write("ampdu_enable", dump_ampdu_enable, apply_ampdu_enable),
        EndpointDescriptor::read_write("rx_stbc", dump_rx_stbc, apply_rx_stbc),
        EndpointDescriptor::read_only("path_rssi", dump_path_rssi),
        EndpointDescriptor::read_write("rssi_disp", dump_rssi_disp, apply_rssi_disp),
        EndpointDescriptor::read_only("vid", dump_vid),
        EndpointDescriptor::read_only("pid", dump_pid),
    ];
    #[cfg(feature = "ap-mode")]
    entries.push(EndpointDescriptor::read_only("all_sta_info", dump_all_sta_info));
    #[cfg(feature = "roam")]
    entries.extend([
        EndpointDescriptor::read_write("roam_flags", dump_roam_flags, apply_roam_flags),
        EndpointDescriptor::read_write("roam_param", dump_roam_param, apply_roam_param),
        EndpointDescriptor::read_write("roam_tgt_addr", dump_none, apply_roam_tgt_addr),
    ]);
    EndpointTable::new(entries)
});

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{CamEntry, SignalStats};

    fn adapter() -> AdapterState {
        AdapterState::new(0x0bda, 0x8178)
    }

    #[test]
    fn reg_write_then_read_back_through_cursor() {
        let adapter = adapter();
        assert_eq!(apply_write_reg(&adapter, b"0x804 0xdeadbeef"), ApplyOutcome::Applied);
        assert_eq!(apply_read_reg(&adapter, b"804"), ApplyOutcome::Applied);
        let mut out = String::new();
        dump_read_reg(&adapter, &mut out).expect("dump");
        assert_eq!(out, "0x0804: 0xdeadbeef\n");
    }

    #[test]
    fn reg_dump_splits_by_range() {
        let adapter = adapter();
        adapter.poke_reg(0x010, 1);
        adapter.poke_reg(0x900, 2);
        adapter.poke_reg(0x1200, 3);
        let mut mac = String::new();
        dump_mac_regs(&adapter, &mut mac).expect("dump");
        assert!(mac.contains("0x0010 0x00000001"));
        assert!(!mac.contains("0x0900"));
        let mut bb = String::new();
        dump_bb_regs(&adapter, &mut bb).expect("dump");
        assert!(bb.contains("0x0900 0x00000002"));
        let mut rf = String::new();
        dump_rf_regs(&adapter, &mut rf).expect("dump");
        assert!(rf.contains("0x1200 0x00000003"));
    }

    #[test]
    fn rx_info_reset_requires_zero_in_first_byte() {
        let adapter = adapter();
        adapter.rx.lock().unwrap().ampdu_drop = 17;
        assert_eq!(apply_rx_info(&adapter, b"1"), ApplyOutcome::Ignored);
        // A zero not in the first byte does not reset.
        assert_eq!(apply_rx_info(&adapter, b" 0\n"), ApplyOutcome::Ignored);
        assert_eq!(adapter.rx.lock().unwrap().ampdu_drop, 17);
        assert_eq!(apply_rx_info(&adapter, b"0\n"), ApplyOutcome::Applied);
        assert_eq!(adapter.rx.lock().unwrap().ampdu_drop, 0);
    }

    #[test]
    fn association_state_dumps_reflect_context() {
        let adapter = adapter();
        adapter.mlme_state.store(0x10, Ordering::Relaxed);
        adapter.qos_option.store(1, Ordering::Relaxed);
        adapter.ht_option.store(1, Ordering::Relaxed);
        adapter.driver_stopped.store(1, Ordering::Relaxed);
        let mut out = String::new();
        dump_mlmext_state(&adapter, &mut out).expect("dump");
        assert_eq!(out, "mlmext_state=0x00000010\n");
        out.clear();
        dump_qos_option(&adapter, &mut out).expect("dump");
        assert_eq!(out, "qos_option=1\n");
        out.clear();
        dump_ht_option(&adapter, &mut out).expect("dump");
        assert_eq!(out, "ht_option=1\n");
        out.clear();
        dump_adapter_state(&adapter, &mut out).expect("dump");
        assert_eq!(out, "surprise_removed=0, driver_stopped=1\n");
    }

    #[test]
    fn path_rssi_dumps_both_paths() {
        let adapter = adapter();
        {
            let mut signal = adapter.signal.lock().unwrap();
            signal.rssi_a = -38;
            signal.rssi_b = -41;
        }
        let mut out = String::new();
        dump_path_rssi(&adapter, &mut out).expect("dump");
        assert_eq!(out, "rssi_a=-38\nrssi_b=-41\n");
    }

    #[test]
    fn cam_clear_drops_hw_decrypt() {
        let adapter = adapter();
        adapter.cam.lock().unwrap().set(
            5,
            CamEntry {
                ctrl: 0x8004,
                mac: [0, 0xe0, 0x4c, 0x87, 0, 1],
                key: [0x11; 16],
            },
        );
        adapter.sec.lock().unwrap().hw_decrypted = true;
        assert_eq!(apply_cam(&adapter, b"c 5"), ApplyOutcome::Applied);
        assert_eq!(adapter.cam.lock().unwrap().bitmap, 0);
        assert!(!adapter.sec.lock().unwrap().hw_decrypted);
        // wfc on a cleared slot has nothing to recommit.
        assert_eq!(apply_cam(&adapter, b"wfc 5"), ApplyOutcome::Ignored);
    }

    #[test]
    fn cam_cache_dump_lists_live_entries_only() {
        let adapter = adapter();
        adapter.cam.lock().unwrap().set(
            2,
            CamEntry {
                ctrl: 0x8004,
                mac: [0, 0xe0, 0x4c, 0x87, 0, 1],
                key: [0xab; 16],
            },
        );
        let mut out = String::new();
        dump_cam_cache(&adapter, &mut out).expect("dump");
        assert!(out.contains("cam bitmap:0x0000000000000004"));
        assert!(out.contains("00:e0:4c:87:00:01"));
        assert_eq!(out.matches("0x8004").count(), 1);
    }

    #[test]
    fn rate_ctl_fixed_and_auto() {
        let adapter = adapter();
        assert_eq!(apply_rate_ctl(&adapter, b"0x0b"), ApplyOutcome::Applied);
        assert_eq!(adapter.rate_ctl.lock().unwrap().fixed_rate, Some(0x0b));
        assert_eq!(apply_rate_ctl(&adapter, b"ff"), ApplyOutcome::Applied);
        assert_eq!(adapter.rate_ctl.lock().unwrap().fixed_rate, None);
    }

    #[test]
    fn signal_and_toggle_applies() {
        let adapter = adapter();
        *adapter.signal.lock().unwrap() = SignalStats {
            strength: 10,
            quality: 20,
            rssi_a: -40,
            rssi_b: -42,
            disp: false,
        };
        assert_eq!(apply_rx_signal(&adapter, b"60 70"), ApplyOutcome::Applied);
        assert_eq!(apply_rx_signal(&adapter, b"60"), ApplyOutcome::Ignored);
        let signal = adapter.signal.lock().unwrap().clone();
        assert_eq!((signal.strength, signal.quality), (60, 70));
        assert_eq!(apply_rx_stbc(&adapter, b"7"), ApplyOutcome::Ignored);
        assert_eq!(apply_rx_stbc(&adapter, b"2"), ApplyOutcome::Applied);
        assert_eq!(apply_ht_enable(&adapter, b"9"), ApplyOutcome::Applied);
        assert_eq!(adapter.ht_enable.load(Ordering::Relaxed), 1);
    }
}
