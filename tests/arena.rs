use quickcheck::TestResult;
use quickcheck_macros::quickcheck;
use tessera::{AccessorDesc, Buffer, ByteBlock, ComponentType, CompositionType, Error};

/// A bump allocation of `n` bytes after `k` succeeds iff `n + k` fits, advances by exactly
/// `n`, and leaves the bump pointer alone on failure.
#[quickcheck]
fn bump_allocation(byte_length: u16, k: u16, n: u16) -> TestResult {
    let (byte_length, k, n) = (byte_length as usize, k as usize, n as usize);
    if k > byte_length {
        return TestResult::discard();
    }
    let mut buffer = Buffer::allocate(byte_length, "prop", 4);
    buffer.take_buffer_view(k, 0).unwrap();
    match buffer.take_buffer_view(n, 0) {
        Ok(view) => TestResult::from_bool(
            n + k <= byte_length
                && view.byte_offset_in_buffer() == k
                && view.byte_length() == n
                && buffer.taken_bytes() == k + n,
        ),
        Err(Error::AllocationOverflow { .. }) => {
            TestResult::from_bool(n + k > byte_length && buffer.taken_bytes() == k)
        }
        Err(_) => TestResult::failed(),
    }
}

/// Offset-placed views never overlap each other or later bump-allocated views.
#[quickcheck]
fn placed_views_are_disjoint(placements: Vec<(u8, u8)>, bumps: u8) -> bool {
    let mut buffer = Buffer::allocate(512, "placed", 1);
    for (offset, len) in placements {
        // overlapping placements are rejected; everything else is kept
        let _ = buffer.take_buffer_view_with_byte_offset(len as usize, 0, offset as usize);
    }
    for _ in 0..bumps % 8 {
        let _ = buffer.take_buffer_view(16, 0);
    }
    let regions = buffer.view_regions();
    regions.iter().enumerate().all(|(i, a)| {
        regions[i + 1..]
            .iter()
            .all(|b| a.is_empty() || b.is_empty() || a.end <= b.start || b.end <= a.start)
    })
}

#[test]
fn default_stride_is_natural_element_size() {
    for component in ComponentType::ALL {
        for composition in CompositionType::ALL {
            for array_length in 1..=3 {
                let expected = composition.number_of_components()
                    * component.size_in_bytes()
                    * array_length;
                let mut buffer = Buffer::allocate(expected, "stride", 4);
                let mut view = buffer.take_buffer_view(expected, 0).unwrap();
                let acc = view
                    .take_accessor(
                        AccessorDesc::new(composition, component, 1).array_length(array_length),
                    )
                    .unwrap();
                assert_eq!(
                    acc.byte_stride(),
                    expected,
                    "{composition} of {component} x{array_length}"
                );
                assert!(acc.is_soa());
            }
        }
    }
}

#[test]
fn exhausted_view_rejects_second_mat4() {
    let mut buffer = Buffer::allocate(100, "e2e", 4);
    let mut view = buffer.take_buffer_view(64, 0).unwrap();
    let desc = AccessorDesc::new(CompositionType::Mat4, ComponentType::Float, 1);
    let first = view.take_accessor(desc.clone()).unwrap();
    assert_eq!(first.byte_length(), 64);
    assert_eq!(
        view.take_accessor(desc).unwrap_err(),
        Error::AllocationOverflow {
            requested: 64,
            byte_offset: 64,
            capacity: 64,
        }
    );
    assert_eq!(view.taken_bytes(), 64);
    assert_eq!(buffer.remaining_bytes(), 36);
}

#[test]
fn buffer_over_foreign_block() {
    let block = ByteBlock::from(&[0u8, 0, 0x80, 0x3f, 0, 0, 0, 0x40][..]);
    let mut buffer = Buffer::new(8, block.clone(), "foreign", 4).unwrap();
    let mut view = buffer.take_buffer_view(8, 0).unwrap();
    let acc = view
        .take_accessor(AccessorDesc::new(
            CompositionType::Vec2,
            ComponentType::Float,
            1,
        ))
        .unwrap();
    let v = acc.get_vec2(0, Default::default());
    assert_eq!((v.x, v.y), (1.0, 2.0));
    assert!(acc.block().ptr_eq(&block));
    assert_eq!(view.to_bytes(), &*block.bytes());
}

#[test]
fn undersized_block_is_rejected() {
    assert!(matches!(
        Buffer::new(16, ByteBlock::zeroed(8), "small", 4),
        Err(Error::OutOfBoundsFootprint { .. })
    ));
}

#[test]
fn realignment_past_block_end_is_rejected() {
    let buffer = Buffer::allocate(12, "short", 4);
    assert_eq!(
        buffer
            .typed_window(1, CompositionType::Scalar, ComponentType::Double, 1)
            .unwrap_err(),
        Error::OutOfBoundsFootprint {
            byte_offset: 8,
            footprint: 8,
            block_length: 12,
        }
    );

    // the view has room for one double at its start, but the block does not once realigned
    let mut buffer = Buffer::with_base_offset(8, ByteBlock::zeroed(12), 4, "tail", 4).unwrap();
    let mut view = buffer.take_buffer_view(8, 0).unwrap();
    assert_eq!(
        view.take_accessor(AccessorDesc::new(
            CompositionType::Scalar,
            ComponentType::Double,
            1,
        ))
        .unwrap_err(),
        Error::OutOfBoundsFootprint {
            byte_offset: 8,
            footprint: 8,
            block_length: 12,
        }
    );
    assert_eq!(view.taken_bytes(), 0);
}
