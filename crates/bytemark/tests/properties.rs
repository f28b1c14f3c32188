use bytemark::{Blob, PadRef, TypeDef};
use bytemark_pack::{decode, encode};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn anonymous_restore_is_one_shot(x in 0usize..1024, y in 0usize..1024) {
        let mut blob = Blob::from_bytes(vec![0u8; 16]);
        blob.seek(x);
        blob.mark(None);
        blob.seek(y);
        prop_assert_eq!(blob.restore(None).unwrap(), x);
        prop_assert_eq!(blob.position(), x);
        prop_assert_eq!(blob.mark_count(), 0);
        prop_assert!(blob.restore(None).is_err());
    }

    #[test]
    fn named_restore_is_persistent(
        x in 0usize..1024,
        y in 0usize..1024,
        name in "[a-z]{1,8}",
    ) {
        let mut blob = Blob::from_bytes(vec![0u8; 16]);
        blob.seek(x);
        blob.mark(Some(&name));
        blob.seek(y);
        prop_assert_eq!(blob.restore(Some(&name)).unwrap(), x);
        blob.seek(y);
        prop_assert_eq!(blob.restore(Some(&name)).unwrap(), x);
        prop_assert_eq!(blob.position(), x);
    }

    #[test]
    fn drop_mark_returns_position_without_moving(
        x in 0usize..256,
        y in 0usize..256,
        name in "[a-z]{1,6}",
    ) {
        let mut blob = Blob::from_bytes(vec![0u8; 4]);
        blob.seek(x);
        blob.mark(Some(&name));
        blob.mark(None);
        blob.seek(y);
        prop_assert_eq!(blob.drop_mark(Some(&name)).unwrap(), x);
        prop_assert_eq!(blob.drop_mark(None).unwrap(), x);
        prop_assert_eq!(blob.position(), y);
    }

    #[test]
    fn split_advances_parent_by_exactly_length(
        pos in 0usize..512,
        len in prop::option::of(0usize..512),
    ) {
        let mut parent = Blob::from_bytes(vec![0u8; 8]);
        parent.seek(pos);
        let child = parent.split(len);
        prop_assert_eq!(child.base_offset(), pos);
        prop_assert_eq!(child.position(), 0);
        prop_assert_eq!(parent.position(), pos + len.unwrap_or(0));
    }

    #[test]
    fn split_siblings_stay_independent(
        pos in 0usize..64,
        a_seek in 0usize..64,
        b_seek in 0usize..64,
    ) {
        let mut parent = Blob::from_bytes(vec![0u8; 64]);
        parent.seek(pos);
        let mut a = parent.split(None);
        let mut b = parent.split(None);
        a.seek(a_seek);
        a.mark(Some("a"));
        a.register_type("t", TypeDef::literal("B"));
        b.seek(b_seek);
        prop_assert_eq!(a.position(), a_seek);
        prop_assert_eq!(b.position(), b_seek);
        prop_assert!(b.restore(Some("a")).is_err());
        prop_assert!(b.resolve("t", &[]).is_err());
        prop_assert_eq!(parent.position(), pos);
    }

    #[test]
    fn pad_is_idempotent_and_aligned(pos in 0usize..4096, step in 2usize..64) {
        let mut blob = Blob::from_bytes(vec![0u8; 8]);
        blob.seek(pos);
        let first = blob.pad(step).unwrap();
        prop_assert!(first >= pos);
        prop_assert!(first - pos < step);
        prop_assert_eq!(first % step, 0);
        let second = blob.pad(step).unwrap();
        prop_assert_eq!(second, first);
    }

    #[test]
    fn pad_against_any_reference(
        pos in 0usize..4096,
        step in 2usize..64,
        reference in 0usize..4096,
    ) {
        let mut blob = Blob::from_bytes(vec![0u8; 8]);
        blob.seek(pos);
        let landed = blob.pad_from(step, PadRef::Position(reference)).unwrap();
        prop_assert!(landed >= pos);
        prop_assert!(landed - pos < step);
        let diff = landed as i128 - reference as i128;
        prop_assert_eq!(diff.rem_euclid(step as i128), 0);
    }

    #[test]
    fn pad_absolute_advances_exactly(pos in 0usize..4096, step in 0usize..64) {
        let mut blob = Blob::from_bytes(vec![0u8; 8]);
        blob.seek(pos);
        prop_assert_eq!(blob.pad_from(step, PadRef::Absolute).unwrap(), pos + step);
    }

    #[test]
    fn read_advances_by_static_size(
        data in prop::collection::vec(any::<u8>(), 32..64),
        start in 0usize..16,
        fmt in prop::sample::select(vec!["B", "H", "i3", "I8", "c4", "B x H"]),
    ) {
        let size = bytemark_pack::size_of(fmt).unwrap();
        let mut blob = Blob::from_bytes(data);
        blob.seek(start);
        blob.read(fmt).unwrap();
        prop_assert_eq!(blob.position(), start + size);
    }

    // Byte-level decode/encode round trip. Pad items are excluded: they
    // decode from any byte but always encode as zero.
    #[test]
    fn fixed_descriptors_roundtrip_bytes(
        data in prop::collection::vec(any::<u8>(), 24..64),
        fmt in prop::sample::select(vec![
            "B", "b", "H", ">h", "i3", ">I5", "I8", "c1", "c4", ">h c2", "B I2 c3",
        ]),
    ) {
        let size = bytemark_pack::size_of(fmt).unwrap();
        let (values, used) = decode(&data, 0, fmt).unwrap();
        prop_assert_eq!(used, size);
        let encoded = encode(fmt, &values).unwrap();
        prop_assert_eq!(encoded.as_slice(), &data[..size]);
    }
}
