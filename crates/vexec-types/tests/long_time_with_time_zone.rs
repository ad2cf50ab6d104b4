use pretty_assertions::assert_eq;
use std::cmp::Ordering;
use std::sync::Arc;
use std::thread;
use vexec_types::time::{PICOSECONDS_PER_DAY, PICOSECONDS_PER_HOUR, PICOSECONDS_PER_MINUTE};
use vexec_types::{
    Block, BlockBuilderStatus, BlockKind, ColumnCodec, FlatCodec, LongTimeWithTimeZone,
    LongTimeWithTimeZoneType, LongTimeWithTimeZoneTypes, OperatorType, ScalarOperator, Type, TypeError, Value,
    DEFAULT_MAX_PAGE_SIZE_IN_BYTES,
};

fn time_type() -> LongTimeWithTimeZoneType {
    LongTimeWithTimeZoneType::new(12).unwrap()
}

fn block_of(ty: &LongTimeWithTimeZoneType, values: &[Option<LongTimeWithTimeZone>]) -> Block {
    let mut builder = ty.create_block_builder(None, values.len(), 12);
    for value in values {
        match value {
            Some(v) => ty.write_value(&mut builder, v),
            None => builder.append_null(),
        }
    }
    builder.build()
}

fn ttz(picoseconds: i64, offset_minutes: i32) -> LongTimeWithTimeZone {
    LongTimeWithTimeZone::new(picoseconds, offset_minutes)
}

#[test]
fn precision_outside_long_range_is_rejected() {
    for precision in [0, 3, 9, 13, 100] {
        assert_eq!(
            LongTimeWithTimeZoneType::new(precision).unwrap_err(),
            TypeError::InvalidPrecision {
                precision,
                min: 10,
                max: 12,
            }
        );
    }
    for precision in 10..=12 {
        assert_eq!(
            LongTimeWithTimeZoneType::new(precision).unwrap().precision(),
            precision
        );
    }
}

#[test]
fn slots_are_twelve_bytes_at_every_precision() {
    for precision in 10..=12 {
        let ty = LongTimeWithTimeZoneType::new(precision).unwrap();
        assert_eq!(ty.fixed_size(), 12);
        assert_eq!(ty.flat_fixed_size(), 12);
        assert_eq!(ty.block_kind(), BlockKind::Fixed12);
    }
}

#[test]
fn block_builder_reservation_is_capped_by_page_budget() {
    let ty = time_type();

    let builder = ty.create_block_builder(None, 10, 12);
    assert_eq!(builder.expected_entries(), 10);

    let builder = ty.create_block_builder(None, usize::MAX, 12);
    assert_eq!(builder.expected_entries(), DEFAULT_MAX_PAGE_SIZE_IN_BYTES / 12);

    let status = BlockBuilderStatus {
        max_page_size_bytes: 120,
    };
    let builder = ty.create_block_builder(Some(&status), 1_000, 12);
    assert_eq!(builder.expected_entries(), 10);

    let builder = ty.create_fixed_size_block_builder(5_000_000);
    assert_eq!(builder.expected_entries(), 5_000_000);
}

#[test]
fn append_to_copies_values_and_nulls() {
    let ty = time_type();
    let source = block_of(&ty, &[Some(ttz(1, 2)), None, Some(ttz(PICOSECONDS_PER_DAY - 1, -840))]);

    let mut builder = ty.create_block_builder(None, 3, 12);
    for position in [2, 1, 0] {
        ty.append_to(&source, position, &mut builder);
    }
    assert_eq!(builder.position_count(), 3);
    let copied = builder.build();

    assert!(copied.is_null(1));
    let first = ty.read_value(&copied, 0);
    assert_eq!(first.picoseconds(), PICOSECONDS_PER_DAY - 1);
    assert_eq!(first.offset_minutes(), -840);
    let last = ty.read_value(&copied, 2);
    assert_eq!((last.picoseconds(), last.offset_minutes()), (1, 2));
}

#[test]
fn flat_layout_is_little_endian_long_then_int() {
    let ty = time_type();
    let value = ttz(0x0102_0304_0506_0708, -2);
    let mut buffer = vec![0xAAu8; 20];

    ty.write_flat(&value, &mut buffer, 4);

    assert_eq!(
        buffer,
        vec![
            0xAA, 0xAA, 0xAA, 0xAA, // untouched prefix
            0x08, 0x07, 0x06, 0x05, 0x04, 0x03, 0x02, 0x01, // picoseconds
            0xFE, 0xFF, 0xFF, 0xFF, // offset minutes
            0xAA, 0xAA, 0xAA, 0xAA, // untouched suffix
        ]
    );

    let read = ty.read_flat(&buffer, 4);
    assert_eq!(read.picoseconds(), 0x0102_0304_0506_0708);
    assert_eq!(read.offset_minutes(), -2);
}

#[test]
fn block_and_flat_paths_agree() {
    let ty = time_type();
    let values = [
        ttz(0, -840),
        ttz(PICOSECONDS_PER_DAY - 1, 840),
        ttz(13 * PICOSECONDS_PER_HOUR, 0),
    ];
    let block = block_of(&ty, &values.map(Some));

    let mut flat = vec![0u8; values.len() * 12];
    for position in 0..values.len() {
        ty.write_block_flat(&block, position, &mut flat, position * 12);
    }

    let mut builder = ty.create_block_builder(None, values.len(), 12);
    for position in 0..values.len() {
        ty.read_flat_to_block(&flat, position * 12, &mut builder);
    }
    let rebuilt = builder.build();

    for (position, expected) in values.iter().enumerate() {
        let from_flat = ty.read_flat(&flat, position * 12);
        let from_block = ty.read_value(&rebuilt, position);
        assert_eq!(from_flat.picoseconds(), expected.picoseconds());
        assert_eq!(from_flat.offset_minutes(), expected.offset_minutes());
        assert_eq!(from_block.picoseconds(), expected.picoseconds());
        assert_eq!(from_block.offset_minutes(), expected.offset_minutes());
    }
}

#[test]
fn equivalent_instants_compare_and_hash_equal() {
    let ty = time_type();
    let a = ttz(500_000_000_000, 60);
    let b = ttz(500_000_000_000 - 60 * PICOSECONDS_PER_MINUTE, 0);

    assert!(ty.equal(&a, &b));
    assert_eq!(ty.hash_code(&a), ty.hash_code(&b));
    assert_eq!(ty.xx_hash64(&a), ty.xx_hash64(&b));
    assert_eq!(ty.comparison(&a, &b), Ordering::Equal);
    assert!(!ty.less_than(&a, &b));
    assert!(ty.less_than_or_equal(&a, &b));

    let block = block_of(&ty, &[Some(a), Some(b)]);
    let ops = ty.type_operators();
    assert!((ops.equal)(&block, 0, &block, 1));
    assert_eq!((ops.hash_code)(&block, 0), (ops.hash_code)(&block, 1));
    assert_eq!((ops.xx_hash64)(&block, 0), (ops.xx_hash64)(&block, 1));
    assert_eq!((ops.hash_code)(&block, 0), ty.hash_code(&a));
    assert_eq!((ops.xx_hash64)(&block, 1), ty.xx_hash64(&b));

    let mut flat = [0u8; 12];
    ty.write_flat(&a, &mut flat, 0);
    assert!((ops.flat_block_equal)(&flat, 0, &block, 1));
}

#[test]
fn ordering_follows_normalized_instant() {
    let ty = time_type();
    // 01:00+02:00 is 23:00 UTC, later than 10:00+00:00.
    let late = ttz(PICOSECONDS_PER_HOUR, 120);
    let early = ttz(10 * PICOSECONDS_PER_HOUR, 0);

    assert_eq!(ty.comparison(&early, &late), Ordering::Less);
    assert_eq!(ty.comparison(&late, &early), Ordering::Greater);
    assert!(ty.less_than(&early, &late));
    assert!(!ty.less_than_or_equal(&late, &early));

    let block = block_of(&ty, &[Some(early), Some(late)]);
    let ops = ty.type_operators();
    assert_eq!((ops.comparison_unordered_last)(&block, 0, &block, 1), Ordering::Less);
    assert_eq!((ops.comparison_unordered_last)(&block, 0, &block, 1) as i8, -1);
    assert!((ops.less_than)(&block, 0, &block, 1));
    assert!((ops.less_than_or_equal)(&block, 1, &block, 1));
    assert!(!(ops.less_than)(&block, 1, &block, 1));
}

#[test]
fn operators_resolve_by_kind() {
    let ty = time_type();
    let block = block_of(&ty, &[Some(ttz(5, 0)), Some(ttz(6, 0))]);
    let ops = ty.type_operators();

    for kind in OperatorType::ALL {
        match (kind, ops.get(kind)) {
            (OperatorType::Equal, ScalarOperator::Equal(f)) => assert!(!f(&block, 0, &block, 1)),
            (OperatorType::HashCode, ScalarOperator::Hash(f)) => {
                assert_eq!(f(&block, 0), (ops.hash_code)(&block, 0))
            }
            (OperatorType::XxHash64, ScalarOperator::Hash(f)) => {
                assert_eq!(f(&block, 0), (ops.xx_hash64)(&block, 0))
            }
            (OperatorType::ComparisonUnorderedLast, ScalarOperator::Comparison(f)) => {
                assert_eq!(f(&block, 1, &block, 0), Ordering::Greater)
            }
            (OperatorType::LessThan, ScalarOperator::LessThan(f)) => {
                assert!(!f(&block, 0, &block, 0))
            }
            (OperatorType::LessThanOrEqual, ScalarOperator::LessThan(f)) => {
                assert!(f(&block, 0, &block, 0))
            }
            (OperatorType::ReadValue, ScalarOperator::ReadValue(f)) => {
                let mut flat = [0u8; 12];
                ty.write_block_flat(&block, 1, &mut flat, 0);
                let mut builder = ty.create_fixed_size_block_builder(1);
                f(&flat, 0, &mut builder);
                assert_eq!(ty.read_value(&builder.build(), 0).picoseconds(), 6);
            }
            (OperatorType::WriteValue, ScalarOperator::WriteFlat(f)) => {
                let mut flat = [0u8; 12];
                f(&block, 0, &mut flat, 0);
                assert_eq!(ty.read_flat(&flat, 0), ttz(5, 0));
            }
            (kind, other) => panic!("{kind:?} resolved to {other:?}"),
        }
    }
}

#[test]
fn objects_roundtrip_through_dynamic_values() {
    let ty = time_type();
    let mut builder = ty.create_block_builder(None, 2, 12);
    ty.write_object(&mut builder, &Value::TimeWithTimeZone(ttz(42, 30)))
        .unwrap();
    ty.write_object(&mut builder, &Value::Null).unwrap();

    let err = ty
        .write_object(&mut builder, &Value::Bigint(7))
        .unwrap_err();
    assert_eq!(
        err,
        TypeError::ValueTypeMismatch {
            type_name: "time(12) with time zone".to_owned(),
            value: "7".to_owned(),
        }
    );

    let block = builder.build();
    assert_eq!(block.position_count(), 2);
    assert_eq!(ty.get_object(&block, 0), Value::TimeWithTimeZone(ttz(42, 30)));
    assert_eq!(ty.get_object(&block, 1), Value::Null);
}

#[test]
fn object_value_renders_at_type_precision() {
    let ty = LongTimeWithTimeZoneType::new(10).unwrap();
    let block = block_of(
        &ty,
        &[Some(ttz(13 * PICOSECONDS_PER_HOUR + 5 * PICOSECONDS_PER_MINUTE + 123_456_789_000, -330)), None],
    );

    let value = ty.object_value(&block, 0).unwrap();
    assert_eq!(value.precision(), 10);
    assert_eq!(value.to_string(), "13:05:00.1234567890-05:30");
    assert_eq!(ty.object_value(&block, 1), None);
}

#[test]
fn write_object_rejects_wrong_builder_kind() {
    let ty = time_type();
    let mut builder = vexec_types::BigintType.create_block_builder(None, 1, 8);
    assert_eq!(
        ty.write_object(&mut builder, &Value::Null).unwrap_err(),
        TypeError::BuilderKindMismatch {
            type_name: "time(12) with time zone".to_owned(),
            expected: BlockKind::Fixed12,
            actual: BlockKind::LongArray,
        }
    );
}

#[test]
fn value_operators_copy_between_block_and_flat_by_kind() {
    let ty = time_type();
    let source = block_of(&ty, &[Some(ttz(PICOSECONDS_PER_DAY - 1, -840))]);
    let ops = ty.type_operators();

    let (ScalarOperator::WriteFlat(write), ScalarOperator::ReadValue(read)) = (
        ops.get(OperatorType::WriteValue),
        ops.get(OperatorType::ReadValue),
    ) else {
        panic!("value operators resolved to the wrong shapes");
    };

    let mut flat = [0u8; 16];
    write(&source, 0, &mut flat, 4);
    assert_eq!(&flat[..4], &[0, 0, 0, 0]);
    assert_eq!(ty.read_flat(&flat, 4), ttz(PICOSECONDS_PER_DAY - 1, -840));

    let mut builder = ty.create_fixed_size_block_builder(1);
    read(&flat, 4, &mut builder);
    let copy = builder.build();
    assert_eq!(copy.get_long(0, 0), PICOSECONDS_PER_DAY - 1);
    assert_eq!(copy.get_int(0, 8), -840);
}

fn operator_results(
    ty: &LongTimeWithTimeZoneType,
    block: &Block,
) -> (bool, bool, bool, bool, Ordering) {
    let ops = ty.type_operators();
    (
        (ops.equal)(block, 0, block, 1),
        (ops.equal)(block, 2, block, 3),
        (ops.hash_code)(block, 0) == (ops.hash_code)(block, 1),
        (ops.xx_hash64)(block, 0) == (ops.xx_hash64)(block, 1),
        (ops.comparison_unordered_last)(block, 2, block, 3),
    )
}

#[test]
fn shared_descriptor_is_usable_from_many_threads() {
    let registry = LongTimeWithTimeZoneTypes::new().unwrap();
    let ty = registry.get(12).unwrap();

    // Positions 0/1: the same instant at the extreme offsets. Positions 2/3: local midnight at
    // +14:00 and -14:00, which are 4 hours apart once normalized.
    let block = Arc::new(block_of(
        &ty,
        &[
            Some(ttz(PICOSECONDS_PER_DAY - 1, 840)),
            Some(ttz(20 * PICOSECONDS_PER_HOUR - 1, -840)),
            Some(ttz(0, 840)),
            Some(ttz(0, -840)),
        ],
    ));

    let expected = operator_results(&ty, &block);
    assert_eq!(expected, (true, false, true, true, Ordering::Less));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let ty = Arc::clone(&ty);
            let block = Arc::clone(&block);
            thread::spawn(move || {
                (0..1_000)
                    .map(|_| operator_results(&ty, &block))
                    .collect::<Vec<_>>()
            })
        })
        .collect();
    for handle in handles {
        for result in handle.join().unwrap() {
            assert_eq!(result, expected);
        }
    }
    assert!(Arc::ptr_eq(&ty, &registry.get(12).unwrap()));
}
