// CLASSIFICATION: COMMUNITY
// Filename: state.rs v0.5
// Author: Lukas Bower
// Date Modified: 2027-08-02

//! Driver and adapter context state exposed through the diagnostics tree.
//!
//! These are the opaque contexts bound to scopes at creation time. All
//! fields use atomics or mutexes so concurrent dump/apply invocations observe
//! self-consistent values; multi-field updates (counter reset, CAM edits)
//! take the owning mutex for the whole update.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU32, AtomicU64, AtomicU8, Ordering};
use std::sync::Mutex;

use bitflags::bitflags;

/// Lowest accepted driver log level.
pub const DRV_LOG_MIN: u8 = 1;
/// Highest accepted driver log level.
pub const DRV_LOG_MAX: u8 = 8;

/// Memory accounting counters behind the `mstat` feature.
#[cfg(feature = "mstat")]
#[derive(Debug, Default)]
pub struct MemStat {
    /// Live allocation count.
    pub alloc_cnt: AtomicU64,
    /// Live allocated bytes.
    pub alloc_bytes: AtomicU64,
    /// High-water mark of allocated bytes.
    pub peak_bytes: AtomicU64,
}

/// Process-wide driver context: the driver scope binds to this.
#[derive(Debug)]
pub struct DriverState {
    /// Driver version string served by `ver_info`.
    pub version: String,
    /// Global log verbosity, `DRV_LOG_MIN..=DRV_LOG_MAX`.
    pub log_level: AtomicU8,
    /// Memory accounting, present when built with `mstat`.
    #[cfg(feature = "mstat")]
    pub mem: MemStat,
}

impl DriverState {
    /// Create driver state advertising the given version string.
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            log_level: AtomicU8::new(4),
            #[cfg(feature = "mstat")]
            mem: MemStat::default(),
        }
    }

    /// Set the log level if within the accepted range; out-of-range values
    /// are ignored, matching the tolerant command contract.
    pub fn set_log_level(&self, level: u8) -> bool {
        if (DRV_LOG_MIN..=DRV_LOG_MAX).contains(&level) {
            self.log_level.store(level, Ordering::Relaxed);
            true
        } else {
            false
        }
    }
}

/// One security CAM entry mirrored from hardware.
#[derive(Copy, Clone, Debug, Default)]
pub struct CamEntry {
    /// Control halfword; zero means the slot is unused.
    pub ctrl: u16,
    /// Peer MAC address.
    pub mac: [u8; 6],
    /// Key material.
    pub key: [u8; 16],
}

/// Number of CAM slots.
pub const CAM_ENTRIES: usize = 32;

/// Cached copy of the hardware security CAM.
#[derive(Debug)]
pub struct CamCache {
    /// Occupancy bitmap, one bit per slot.
    pub bitmap: u64,
    /// The cached entries.
    pub entries: [CamEntry; CAM_ENTRIES],
}

impl Default for CamCache {
    fn default() -> Self {
        Self {
            bitmap: 0,
            entries: [CamEntry::default(); CAM_ENTRIES],
        }
    }
}

impl CamCache {
    /// Install an entry into a slot.
    pub fn set(&mut self, id: usize, entry: CamEntry) {
        if id < CAM_ENTRIES {
            self.entries[id] = entry;
            self.bitmap |= 1 << id;
        }
    }

    /// Drop an entry from a slot.
    pub fn clear(&mut self, id: usize) {
        if id < CAM_ENTRIES {
            self.entries[id] = CamEntry::default();
            self.bitmap &= !(1 << id);
        }
    }
}

/// Security state summary.
#[derive(Debug, Default)]
pub struct SecInfo {
    /// Whether hardware decryption is currently in use.
    pub hw_decrypted: bool,
    /// Negotiated authentication algorithm.
    pub auth_alg: u8,
    /// Negotiated pairwise cipher.
    pub enc_alg: u8,
}

/// Receive-path diagnostic counters; reset as one unit.
#[derive(Debug, Default, Clone)]
pub struct RxStats {
    /// Frames below the reorder window (delayed, retransmitted, duplicate).
    pub ampdu_drop: u64,
    /// Reorder timer expiries forcing indication.
    pub ampdu_forced_indicate: u64,
    /// Frames lost out of the aggregation window.
    pub ampdu_loss: u64,
    /// Duplicate management frames dropped.
    pub dup_mgt_drop: u64,
    /// Block-ack window shifts.
    pub ba_window_shift: u64,
}

impl RxStats {
    /// Reset every counter. Runs under the owning mutex so a reset never
    /// interleaves with a concurrent multi-field increment.
    pub fn reset(&mut self) {
        *self = RxStats::default();
    }
}

/// Transmit/receive totals for `trx_info`.
#[derive(Debug, Default)]
pub struct TrxStats {
    /// Frames transmitted.
    pub tx_pkts: AtomicU64,
    /// Frames received.
    pub rx_pkts: AtomicU64,
    /// Transmit drops.
    pub tx_drop: AtomicU64,
    /// Receive drops.
    pub rx_drop: AtomicU64,
}

/// Per-path signal quality snapshot.
#[derive(Debug, Default, Clone)]
pub struct SignalStats {
    /// Signal strength percentage.
    pub strength: u8,
    /// Signal quality percentage.
    pub quality: u8,
    /// Path A RSSI in dBm.
    pub rssi_a: i8,
    /// Path B RSSI in dBm.
    pub rssi_b: i8,
    /// Whether periodic RSSI display logging is enabled.
    pub disp: bool,
}

/// Rate control override: `None` is automatic selection.
#[derive(Debug, Default)]
pub struct RateCtl {
    /// Fixed rate index, or `None` for auto.
    pub fixed_rate: Option<u8>,
}

/// Roaming parameters behind the `roam` feature.
#[cfg(feature = "roam")]
#[derive(Debug, Default, Clone)]
pub struct RoamParams {
    /// Roam behavior flag bits.
    pub flags: u8,
    /// RSSI delta required before roaming.
    pub rssi_diff_th: u8,
    /// Scan interval in units of survey periods.
    pub scan_int_ms: u32,
    /// Preferred roam target, all-zero when unset.
    pub tgt_addr: [u8; 6],
}

/// Associated station summary behind the `ap-mode` feature.
#[cfg(feature = "ap-mode")]
#[derive(Debug, Clone)]
pub struct StaInfo {
    /// Station MAC address.
    pub mac: [u8; 6],
    /// Association id.
    pub aid: u16,
    /// Frames sent to the station.
    pub tx_pkts: u64,
    /// Frames received from the station.
    pub rx_pkts: u64,
}

bitflags! {
    /// Dynamic-mechanism ability mask.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct DmAbility: u32 {
        /// Dynamic initial gain.
        const DIG = 1 << 0;
        /// Dynamic transmit power.
        const DYNAMIC_TXPWR = 1 << 1;
        /// False-alarm counting.
        const FA_CNT = 1 << 2;
        /// RSSI monitoring.
        const RSSI_MONITOR = 1 << 3;
        /// CCK packet detection tuning.
        const CCK_PD = 1 << 4;
        /// Antenna diversity.
        const ANT_DIV = 1 << 5;
        /// Power training.
        const PWR_TRAIN = 1 << 6;
        /// Rate adaptation.
        const RATE_ADAPTIVE = 1 << 7;
    }
}

/// Adaptivity (EDCCA) tuning parameters.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AdaptivityParams {
    /// Initial listen-to-high threshold.
    pub th_l2h_ini: i8,
    /// EDCCA high/low hysteresis.
    pub th_edcca_hl_diff: i8,
    /// IGI baseline.
    pub igi_base: i8,
    /// Force EDCCA on regardless of RSSI.
    pub force_edcca: bool,
    /// RSSI above which adaptivity engages.
    pub adap_en_rssi: u8,
    /// IGI floor.
    pub igi_lowerbound: u8,
}

impl Default for AdaptivityParams {
    fn default() -> Self {
        Self {
            th_l2h_ini: 0xf5u8 as i8,
            th_edcca_hl_diff: 7,
            igi_base: 0x32,
            force_edcca: false,
            adap_en_rssi: 20,
            igi_lowerbound: 0x12,
        }
    }
}

/// Dynamic-mechanism subsystem state; the `dm` scope binds to the owning
/// adapter and reaches this through it.
#[derive(Debug)]
pub struct DmState {
    /// Enabled mechanism mask.
    pub ability: Mutex<DmAbility>,
    /// Debug verbosity of the dm engine.
    pub dbg_level: AtomicU32,
    /// Debug component mask of the dm engine.
    pub dbg_comp: AtomicU64,
    /// Adaptivity tuning.
    pub adaptivity: Mutex<AdaptivityParams>,
}

impl Default for DmState {
    fn default() -> Self {
        Self {
            ability: Mutex::new(
                DmAbility::DIG | DmAbility::FA_CNT | DmAbility::RSSI_MONITOR | DmAbility::RATE_ADAPTIVE,
            ),
            dbg_level: AtomicU32::new(3),
            dbg_comp: AtomicU64::new(0),
            adaptivity: Mutex::new(AdaptivityParams::default()),
        }
    }
}

/// Per-interface adapter context: interface and `dm` scopes bind to this.
/// The registry holds it by `Arc`; the same instance survives interface
/// renames.
#[derive(Debug)]
pub struct AdapterState {
    /// USB vendor id.
    pub vid: u16,
    /// USB product id.
    pub pid: u16,
    /// WiFi spec compliance mode from the registry configuration.
    pub wifi_spec: u8,
    /// Firmware/connection state bits.
    pub fw_state: AtomicU32,
    /// MLME extension state bits for the current association.
    pub mlme_state: AtomicU32,
    /// Whether WMM/QoS was negotiated.
    pub qos_option: AtomicU8,
    /// Whether HT was negotiated.
    pub ht_option: AtomicU8,
    /// Device removed beneath the driver.
    pub surprise_removed: AtomicU8,
    /// Driver halt in progress.
    pub driver_stopped: AtomicU8,
    /// Register window backing `read_reg`/`write_reg` and the range dumps.
    pub regs: Mutex<BTreeMap<u32, u32>>,
    /// Cursor set by writing `read_reg`: address the next dump reads.
    pub reg_read_addr: AtomicU32,
    /// Security summary.
    pub sec: Mutex<SecInfo>,
    /// Security CAM cache.
    pub cam: Mutex<CamCache>,
    /// Receive-path diagnostic counters.
    pub rx: Mutex<RxStats>,
    /// Transmit/receive totals.
    pub trx: TrxStats,
    /// Signal snapshot.
    pub signal: Mutex<SignalStats>,
    /// Rate control override.
    pub rate_ctl: Mutex<RateCtl>,
    /// 40MHz bonding enable.
    pub cbw40_enable: AtomicU8,
    /// HT support enable.
    pub ht_enable: AtomicU8,
    /// AMPDU aggregation enable.
    pub ampdu_enable: AtomicU8,
    /// Receive STBC capability setting.
    pub rx_stbc: AtomicU8,
    /// Roaming parameters.
    #[cfg(feature = "roam")]
    pub roam: Mutex<RoamParams>,
    /// Stations associated in AP mode.
    #[cfg(feature = "ap-mode")]
    pub stations: Mutex<Vec<StaInfo>>,
    /// Dynamic-mechanism subsystem state.
    pub dm: DmState,
}

impl AdapterState {
    /// Create adapter state for a device with the given USB ids.
    pub fn new(vid: u16, pid: u16) -> Self {
        Self {
            vid,
            pid,
            wifi_spec: 0,
            fw_state: AtomicU32::new(0),
            mlme_state: AtomicU32::new(0),
            qos_option: AtomicU8::new(0),
            ht_option: AtomicU8::new(0),
            surprise_removed: AtomicU8::new(0),
            driver_stopped: AtomicU8::new(0),
            regs: Mutex::new(BTreeMap::new()),
            reg_read_addr: AtomicU32::new(0),
            sec: Mutex::new(SecInfo::default()),
            cam: Mutex::new(CamCache::default()),
            rx: Mutex::new(RxStats::default()),
            trx: TrxStats::default(),
            signal: Mutex::new(SignalStats::default()),
            rate_ctl: Mutex::new(RateCtl::default()),
            cbw40_enable: AtomicU8::new(1),
            ht_enable: AtomicU8::new(1),
            ampdu_enable: AtomicU8::new(1),
            rx_stbc: AtomicU8::new(1),
            #[cfg(feature = "roam")]
            roam: Mutex::new(RoamParams::default()),
            #[cfg(feature = "ap-mode")]
            stations: Mutex::new(Vec::new()),
            dm: DmState::default(),
        }
    }

    /// Store a register value, as the hardware access path would.
    pub fn poke_reg(&self, addr: u32, value: u32) {
        self.regs
            .lock()
            .expect("poisoned regs lock")
            .insert(addr, value);
    }

    /// Read a register value, zero when never written.
    pub fn peek_reg(&self, addr: u32) -> u32 {
        self.regs
            .lock()
            .expect("poisoned regs lock")
            .get(&addr)
            .copied()
            .unwrap_or(0)
    }
}
