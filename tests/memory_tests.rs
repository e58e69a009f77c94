//! Integration tests for the single-port RAM model.

use proptest::prelude::*;
use servio::common::*;
use servio::soc::memory::SinglePortRam;

/// Creates the default 1024 x 8-bit RAM.
fn create_default_ram() -> SinglePortRam {
    SinglePortRam::new(1024, 8, 8, 0, true).unwrap()
}

/// Tests RAM creation with the default geometry.
#[test]
fn test_ram_creation() {
    let ram = create_default_ram();

    assert_eq!(ram.depth(), 1024);
    assert_eq!(ram.width(), 8);
    assert_eq!(ram.body(), 1);
    assert!(ram.skip_align());
    assert_eq!(ram.mask(), 0xFF);
}

/// Tests that every word starts at the configured init value.
#[test]
fn test_ram_init_fill() {
    let ram = SinglePortRam::new(64, 32, 8, 0xDEAD_BEEF, true).unwrap();

    for index in 0..64 {
        assert_eq!(ram.peek(index), Some(0xDEAD_BEEF));
    }
    assert_eq!(ram.peek(64), None);
}

/// Tests that init is truncated to the word width.
#[test]
fn test_ram_init_truncated() {
    let ram = SinglePortRam::new(4, 16, 8, 0x1_2345, true).unwrap();
    assert_eq!(ram.read(0).unwrap(), 0x2345);
}

/// Tests the write 0xAB / read back scenario on the default RAM.
#[test]
fn test_ram_write_then_read() {
    let mut ram = create_default_ram();

    ram.write(5, 0xAB).unwrap();
    assert_eq!(ram.read(5).unwrap(), 0xAB);
    assert_eq!(ram.read(6).unwrap(), 0);
}

/// Tests that written values are masked to the word width.
#[test]
fn test_ram_write_masked() {
    let mut ram = create_default_ram();
    ram.write(3, 0x1FF).unwrap();
    assert_eq!(ram.read(3).unwrap(), 0xFF);

    let mut wide = SinglePortRam::new(8, 64, 8, 0, true).unwrap();
    wide.write(8, u64::MAX).unwrap();
    assert_eq!(wide.read(8).unwrap(), u64::MAX);
}

/// Tests that a write touches only its own word.
#[test]
fn test_ram_write_isolation() {
    let mut ram = SinglePortRam::new(16, 32, 8, 0x5555_5555, true).unwrap();

    ram.write(0x20, 0x0102_0304).unwrap();

    assert_eq!(ram.read(0x1C).unwrap(), 0x5555_5555);
    assert_eq!(ram.read(0x20).unwrap(), 0x0102_0304);
    assert_eq!(ram.read(0x24).unwrap(), 0x5555_5555);
}

/// Tests that addresses within one word alias when alignment is skipped.
#[test]
fn test_ram_byte_offset_ignored() {
    let mut ram = SinglePortRam::new(16, 32, 8, 0, true).unwrap();

    ram.write(0x11, 0xCAFE_F00D).unwrap();
    for address in 0x10..0x14 {
        assert_eq!(ram.read(address).unwrap(), 0xCAFE_F00D);
    }
    assert_eq!(ram.read(0x14).unwrap(), 0);
}

/// Tests that strict alignment rejects nonzero byte offsets.
#[test]
fn test_ram_alignment_fault() {
    let mut ram = SinglePortRam::new(16, 32, 8, 0, false).unwrap();

    assert!(ram.read(0x10).is_ok());
    let err = ram.read(0x12).unwrap_err();
    assert_eq!(
        err,
        SimError::AlignmentFault {
            op: AccessType::Read,
            address: 0x12,
            offset: 2,
        }
    );

    let err = ram.write(0x13, 1).unwrap_err();
    assert_eq!(err.op(), Some(AccessType::Write));
    assert_eq!(err.address(), Some(0x13));
    assert_eq!(ram.read(0x10).unwrap(), 0);
}

/// Tests that an 8-bit RAM never raises alignment faults.
#[test]
fn test_ram_byte_wide_always_aligned() {
    let ram = SinglePortRam::new(16, 8, 8, 0, false).unwrap();
    for address in 0..16 {
        assert!(ram.read(address).is_ok());
    }
}

/// Tests that out-of-range word indices raise addressing faults.
#[test]
fn test_ram_addressing_fault() {
    let mut ram = create_default_ram();

    assert!(ram.read(1023).is_ok());
    let err = ram.read(1024).unwrap_err();
    assert_eq!(
        err,
        SimError::AddressingFault {
            op: AccessType::Read,
            address: 1024,
            index: 1024,
            depth: 1024,
        }
    );

    let err = ram.write(u64::MAX, 7).unwrap_err();
    assert!(matches!(err, SimError::AddressingFault { op: AccessType::Write, .. }));
}

/// Tests the fault message names the address and operation.
#[test]
fn test_ram_fault_display() {
    let ram = SinglePortRam::new(4, 32, 8, 0, true).unwrap();
    let msg = ram.read(0x40).unwrap_err().to_string();

    assert!(msg.contains("read"));
    assert!(msg.contains("0x40"));
}

/// Tests that invalid geometries fail at construction.
#[test]
fn test_ram_configuration_errors() {
    for width in [0, 4, 12, 24, 128] {
        assert!(matches!(
            SinglePortRam::new(16, width, 8, 0, true),
            Err(SimError::ConfigurationError(_))
        ));
    }
    assert!(matches!(
        SinglePortRam::new(16, 32, 16, 0, true),
        Err(SimError::ConfigurationError(_))
    ));
    assert!(matches!(
        SinglePortRam::new(0, 32, 8, 0, true),
        Err(SimError::ConfigurationError(_))
    ));
}

/// Tests that a geometry too large to address is a configuration error.
#[test]
fn test_ram_geometry_overflow() {
    assert!(matches!(
        SinglePortRam::new(usize::MAX / 4, 64, 8, 0, true),
        Err(SimError::ConfigurationError(_))
    ));
    assert!(matches!(
        SinglePortRam::new(usize::MAX, 16, 8, 0, true),
        Err(SimError::ConfigurationError(_))
    ));
}

/// Tests that reset restores init and is idempotent.
#[test]
fn test_ram_reset() {
    let mut ram = SinglePortRam::new(32, 16, 8, 0x00AA, true).unwrap();

    for index in 0..32u64 {
        ram.write(index * 2, index).unwrap();
    }
    ram.reset();
    ram.reset();

    for index in 0..32 {
        assert_eq!(ram.peek(index), Some(0x00AA));
    }
}

/// Tests a full write pass read back in reverse order.
#[test]
fn test_ram_full_pass_round_trip() {
    let mut ram = SinglePortRam::new(256, 32, 8, 0, true).unwrap();
    let values: Vec<u64> = (0..256u64).map(|i| i.wrapping_mul(0x9E37_79B9) & 0xFFFF_FFFF).collect();

    for (index, value) in values.iter().enumerate() {
        ram.write((index * 4) as u64, *value).unwrap();
    }
    for index in (0..256).rev() {
        assert_eq!(ram.read((index * 4) as u64).unwrap(), values[index]);
    }
    // Reads are repeatable.
    assert_eq!(ram.read(0x10).unwrap(), values[4]);
    assert_eq!(ram.read(0x10).unwrap(), values[4]);
}

/// Tests that loading assembles little-endian words.
#[test]
fn test_ram_load_little_endian() {
    let mut ram = SinglePortRam::new(4, 32, 8, 0xFFFF_FFFF, true).unwrap();

    let words = ram.load(&[0x37, 0x05, 0x00, 0x40, 0x13, 0x05], 0).unwrap();

    assert_eq!(words, 2);
    assert_eq!(ram.read(0).unwrap(), 0x4000_0537);
    assert_eq!(ram.read(4).unwrap(), 0x0000_0513);
    assert_eq!(ram.read(8).unwrap(), 0xFFFF_FFFF);
}

/// Tests that an oversized load is rejected without writing.
#[test]
fn test_ram_load_overflow() {
    let mut ram = SinglePortRam::new(2, 16, 8, 0, true).unwrap();

    let err = ram.load(&[1, 2, 3, 4, 5], 0).unwrap_err();
    assert!(matches!(err, SimError::AddressingFault { index: 2, depth: 2, .. }));
    assert_eq!(ram.read(0).unwrap(), 0);
}

/// Tests that a load offset near the top of the index range faults.
#[test]
fn test_ram_load_offset_overflow() {
    let mut ram = SinglePortRam::new(4, 32, 8, 0, true).unwrap();

    let err = ram.load(&[1, 2, 3, 4], usize::MAX).unwrap_err();
    assert!(matches!(err, SimError::AddressingFault { depth: 4, .. }));

    let err = ram.load(&[1, 2, 3, 4], 4).unwrap_err();
    assert!(matches!(err, SimError::AddressingFault { index: 4, .. }));
}

proptest! {
    /// Any in-range write reads back masked to the word width.
    #[test]
    fn prop_write_read_masked(
        width_sel in 0usize..4,
        index in 0u64..64,
        offset in 0u64..8,
        value in any::<u64>(),
    ) {
        let width = [8u32, 16, 32, 64][width_sel];
        let body = (width / 8) as u64;
        let mut ram = SinglePortRam::new(64, width, 8, 0, true).unwrap();
        let address = index * body + offset % body;

        ram.write(address, value).unwrap();

        prop_assert_eq!(ram.read(address).unwrap(), value & ram.mask());
        prop_assert_eq!(ram.read(index * body).unwrap(), value & ram.mask());
    }

    /// Writes never alias across word boundaries.
    #[test]
    fn prop_no_cross_word_alias(a in 0u64..32, b in 0u64..32, value in 1u64..=0xFFFF) {
        prop_assume!(a != b);
        let mut ram = SinglePortRam::new(32, 16, 8, 0, true).unwrap();

        ram.write(a * 2, value).unwrap();

        prop_assert_eq!(ram.read(b * 2).unwrap(), 0);
    }
}
