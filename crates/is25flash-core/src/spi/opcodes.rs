//! IS25LP serial flash opcodes
//!
//! Single-I/O command set used over the legacy 3-byte address mode.

// ============================================================================
// Write control
// ============================================================================

/// Write Enable - required before any write/erase operation
pub const WREN: u8 = 0x06;
/// Write Disable - clears WEL bit in status register
pub const WRDI: u8 = 0x04;

// ============================================================================
// Status register operations
// ============================================================================

/// Read Status Register
pub const RDSR: u8 = 0x05;
/// Read Status Register 2 (not present on every part)
pub const RDSR2: u8 = 0x35;

// ============================================================================
// Identification
// ============================================================================

/// Read JEDEC ID (manufacturer, memory type, capacity)
pub const RDID: u8 = 0x9F;
/// Read Unique ID
pub const RDUID: u8 = 0x4B;

// ============================================================================
// Read commands - 3-byte address
// ============================================================================

/// Normal Read (no dummy byte)
pub const READ: u8 = 0x03;
/// Fast Read (one dummy byte after the address)
pub const FAST_READ: u8 = 0x0B;

// ============================================================================
// Program and erase - 3-byte address
// ============================================================================

/// Page Program
pub const PP: u8 = 0x02;
/// Sector Erase 4KB
pub const SE_20: u8 = 0x20;
/// Block Erase 32KB
pub const BE_52: u8 = 0x52;
/// Block Erase 64KB
pub const BE_D8: u8 = 0xD8;
/// Chip Erase
pub const CE_C7: u8 = 0xC7;

// ============================================================================
// Power management
// ============================================================================

/// Deep Power Down
pub const DP: u8 = 0xB9;
/// Release from Deep Power Down
pub const RDP: u8 = 0xAB;

// ============================================================================
// Frame geometry
// ============================================================================

/// Reserved bytes clocked between RDUID and the first ID byte
pub const RDUID_DUMMY_BYTES: u8 = 4;
/// Dummy bytes clocked between the FAST_READ address and data
pub const FAST_READ_DUMMY_BYTES: u8 = 1;
