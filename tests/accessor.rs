use nalgebra::{Matrix2, Vector3};
use quickcheck::TestResult;
use quickcheck_macros::quickcheck;
use tessera::{
    AccessOptions, Accessor, AccessorDesc, Buffer, ComponentType, CompositionType, Error,
};

fn single(composition: CompositionType, component: ComponentType, count: usize) -> Accessor {
    let desc = AccessorDesc::new(composition, component, count);
    let mut buffer = Buffer::allocate(desc.footprint(desc.element_size()), "single", 4);
    let mut view = buffer.take_buffer_view(buffer.byte_length(), 0).unwrap();
    view.take_accessor(desc).unwrap()
}

/// Small integers, negative where the component type allows it; representable by every
/// component type.
fn sample(component: ComponentType, k: usize) -> f64 {
    let v = (k % 100) as f64 + 1.0;
    if component.is_signed() && k % 2 == 1 {
        -v
    } else {
        v
    }
}

#[test]
fn round_trip_every_layout() {
    for component in ComponentType::ALL {
        for composition in CompositionType::ALL {
            let mut acc = single(composition, component, 3);
            let n = composition.number_of_components();
            for i in 0..3 {
                let values: Vec<f64> = (0..n).map(|k| sample(component, k + i * n)).collect();
                acc.set_element(i, &values, AccessOptions::new());
            }
            for i in 0..3 {
                let expected: Vec<f64> = (0..n).map(|k| sample(component, k + i * n)).collect();
                assert_eq!(
                    acc.get_element(i, AccessOptions::new()),
                    expected,
                    "{composition} of {component}"
                );
            }
        }
    }
}

#[quickcheck]
fn float_vec3_round_trip(x: f32, y: f32, z: f32) -> TestResult {
    if x.is_nan() || y.is_nan() || z.is_nan() {
        return TestResult::discard();
    }
    let mut acc = single(CompositionType::Vec3, ComponentType::Float, 1);
    acc.set_vec3(0, x as f64, y as f64, z as f64, AccessOptions::new());
    TestResult::from_bool(
        acc.get_vec3(0, AccessOptions::new()) == Vector3::new(x as f64, y as f64, z as f64),
    )
}

#[quickcheck]
fn double_round_trip_either_endian(v: f64, big: bool) -> TestResult {
    if v.is_nan() {
        return TestResult::discard();
    }
    let mut acc = single(CompositionType::Scalar, ComponentType::Double, 1);
    let opts = if big {
        AccessOptions::new().big_endian()
    } else {
        AccessOptions::new()
    };
    acc.set_scalar(0, v, opts);
    TestResult::from_bool(acc.get_scalar(0, opts) == v)
}

#[test]
fn matrix_round_trip() {
    let mut acc = single(CompositionType::Mat2, ComponentType::Short, 2);
    let m = Matrix2::new(1.0, -2.0, 3.0, -4.0);
    acc.set_mat2(1, &m, AccessOptions::new());
    assert_eq!(acc.get_mat2(1, AccessOptions::new()), m);
    // column-major in memory
    assert_eq!(acc.get_element(1, AccessOptions::new()), vec![1.0, 3.0, -2.0, -4.0]);
}

#[test]
fn soa_writes_are_isolated() {
    let mut buffer = Buffer::allocate(72, "soa", 4);
    let mut view = buffer.take_buffer_view(72, 0).unwrap();
    let mut accessors: Vec<Accessor> = [
        CompositionType::Vec4,
        CompositionType::Vec3,
        CompositionType::Vec2,
    ]
    .into_iter()
    .map(|c| {
        view.take_accessor(AccessorDesc::new(c, ComponentType::Float, 2))
            .unwrap()
    })
    .collect();
    assert_eq!(view.taken_bytes(), 72);
    assert!(view.is_soa());

    accessors[0].set_scalar(0, 100.0, AccessOptions::new());
    accessors[0].set_scalar(1, 150.0, AccessOptions::new());
    accessors[1].set_scalar(0, 200.0, AccessOptions::new());

    let bytes = view.to_bytes();
    let read = |offset: usize| {
        f32::from_le_bytes([
            bytes[offset],
            bytes[offset + 1],
            bytes[offset + 2],
            bytes[offset + 3],
        ])
    };
    assert_eq!(read(0), 100.0);
    assert_eq!(read(16), 150.0);
    assert_eq!(read(32), 200.0);
    assert_eq!(accessors[2].to_components(), vec![0.0; 4]);
}

#[test]
fn min_max_is_idempotent_until_written() {
    let mut acc = single(CompositionType::Vec2, ComponentType::UnsignedByte, 3);
    acc.copy_from_components(&[4.0, 9.0, 1.0, 200.0, 7.0, 0.0]);
    acc.calc_min_max();
    let first = (acc.min().to_vec(), acc.max().to_vec());
    acc.calc_min_max();
    assert_eq!((acc.min().to_vec(), acc.max().to_vec()), first);
    assert_eq!(first, (vec![1.0, 0.0], vec![7.0, 200.0]));
    assert!(!acc.is_min_max_dirty());

    acc.set_vec2(0, 4.0, 9.0, AccessOptions::new());
    assert!(acc.is_min_max_dirty());
    acc.calc_min_max();
    assert!(!acc.is_min_max_dirty());
}

#[test]
fn take_one_hands_out_disjoint_slots() {
    let mut buffer = Buffer::allocate(64, "instances", 4);
    let mut view = buffer.take_buffer_view(64, 0).unwrap();
    let mut all = view
        .take_accessor(AccessorDesc::new(
            CompositionType::Vec4,
            ComponentType::Float,
            4,
        ))
        .unwrap();
    let mut slots = Vec::new();
    for _ in 0..4 {
        slots.push(all.take_one().unwrap());
    }
    assert_eq!(all.taken_slots(), 4);
    assert_eq!(all.take_one().unwrap_err(), Error::SlotOverflow { count: 4 });

    for (i, slot) in slots.iter_mut().enumerate() {
        assert_eq!(slot.count(), 1);
        assert_eq!(slot.byte_offset_in_view(), i * 16);
        slot.set_vec4(0, i as f64, 0.0, 0.0, 1.0, AccessOptions::new());
    }
    for i in 0..4 {
        assert_eq!(all.get_vec4(i, AccessOptions::new()).x, i as f64);
    }
}

#[test]
fn indexed_reads_follow_indices() {
    let mut buffer = Buffer::allocate(64, "indexed", 4);
    let mut view = buffer.take_buffer_view(64, 0).unwrap();
    let mut positions = view
        .take_accessor(AccessorDesc::new(
            CompositionType::Vec3,
            ComponentType::Float,
            3,
        ))
        .unwrap();
    let mut indices = view
        .take_accessor(AccessorDesc::new(
            CompositionType::Scalar,
            ComponentType::UnsignedByte,
            6,
        ))
        .unwrap();
    positions.copy_from_components(&[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
    indices.copy_from_components(&[0.0, 1.0, 2.0, 2.0, 1.0, 0.0]);

    let opts = AccessOptions::new().indexed(&indices);
    let walked: Vec<Vector3<f64>> = (0..6).map(|i| positions.get_vec3(i, opts)).collect();
    assert_eq!(walked[1], Vector3::new(1.0, 0.0, 0.0));
    assert_eq!(walked[3], Vector3::new(0.0, 1.0, 0.0));
    assert_eq!(walked[5], Vector3::zeros());
}

#[test]
fn big_endian_layout() {
    let mut buffer = Buffer::allocate(4, "be", 4);
    let mut view = buffer.take_buffer_view(4, 0).unwrap();
    let mut acc = view
        .take_accessor(AccessorDesc::new(
            CompositionType::Scalar,
            ComponentType::UnsignedInt,
            1,
        ))
        .unwrap();
    acc.set_scalar(0, 0x0a0b_0c0d as f64, AccessOptions::new().big_endian());
    assert_eq!(view.to_bytes(), vec![0x0a, 0x0b, 0x0c, 0x0d]);
    assert_eq!(acc.get_scalar(0, AccessOptions::new()), 0x0d0c_0b0a as f64);
}

#[test]
fn integer_writes_saturate() {
    let mut acc = single(CompositionType::Vec2, ComponentType::Byte, 1);
    acc.set_vec2(0, 1000.0, -1000.0, AccessOptions::new());
    assert_eq!(acc.get_element(0, AccessOptions::new()), vec![127.0, -128.0]);
}

#[test]
fn interleaved_accessors_alias_one_view() {
    let mut buffer = Buffer::allocate(40, "interleaved", 4);
    let mut view = buffer.take_buffer_view(40, 20).unwrap();
    let mut position = view
        .take_accessor_with_byte_offset(
            AccessorDesc::new(CompositionType::Vec3, ComponentType::Float, 2),
            0,
        )
        .unwrap();
    let mut uv = view
        .take_accessor_with_byte_offset(
            AccessorDesc::new(CompositionType::Vec2, ComponentType::Float, 2),
            12,
        )
        .unwrap();
    assert!(view.is_aos());
    assert!(position.is_aos() && uv.is_aos());

    position.set_vec3(1, 1.0, 2.0, 3.0, AccessOptions::new());
    uv.set_vec2(1, 0.5, 0.25, AccessOptions::new());
    assert_eq!(
        view.to_bytes()[20..40]
            .chunks(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect::<Vec<_>>(),
        vec![1.0, 2.0, 3.0, 0.5, 0.25]
    );
    assert_eq!(position.get_vec3(1, AccessOptions::new()), Vector3::new(1.0, 2.0, 3.0));
}
