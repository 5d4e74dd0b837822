#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use codec_regress::digest::DigestAlg;
    use codec_regress::fixtures::{FixtureError, FixtureRecord, FixtureTable};
    use codec_regress::media::{ChromaFormat, SliceMode};

    fn golden_path() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures/decode_encode.json")
    }

    #[test]
    fn golden_table_loads() {
        let table = FixtureTable::from_path(golden_path()).unwrap();
        assert_eq!(table.len(), 2);

        let one_d = table.get("test_vd_1d").unwrap();
        assert_eq!(one_d.source, "res/test_vd_1d.264");
        assert_eq!(one_d.expected().unwrap().to_hex(), "c04a5978eb715837c29463e79b6598a05136829f");

        let rc = table.get("test_vd_rc").unwrap();
        assert_eq!(rc.expected().unwrap().to_hex(), "40d8eb5a54d358c663f836c689a158c326de4b1c");

        for f in &table {
            assert_eq!((f.width, f.height), (320, 192));
            assert_eq!(f.frame_rate, 12.0);
            assert_eq!(f.mode, SliceMode::Single);
            assert_eq!(f.chroma, ChromaFormat::Yuv420);
            assert_eq!(f.digest_alg, DigestAlg::Sha1);
            assert_eq!(f.encode_params().frame_len(), 320 * 192 * 3 / 2);
        }
    }

    #[test]
    fn optional_fields_default() {
        let json = r#"{ "fixtures": [
            { "source": "clips/a.yuv", "expected_digest": "da39a3ee5e6b4b0d3255bfef95601890afd80709",
              "width": 16, "height": 16, "frame_rate": 30 }
        ] }"#;
        let table = FixtureTable::from_json_str(json).unwrap();
        let f = table.get("a.yuv").unwrap();
        assert_eq!(f.name(), "a.yuv");
        assert_eq!(f.mode, SliceMode::Single);
        assert_eq!(f.digest_alg, DigestAlg::Sha1);
    }

    #[test]
    fn explicit_options_parse() {
        let json = r#"{ "fixtures": [
            { "name": "sliced", "source": "b.yuv", "width": 8, "height": 8, "frame_rate": 25.0,
              "expected_digest": "af1349b9f5f9a1a6a0404dea36dcc9499bcb25c9adc112b7cc9a93cae41f3262",
              "mode": { "fixed_count": 4 }, "chroma": "yuv444", "digest_alg": "blake3" }
        ] }"#;
        let table = FixtureTable::from_json_str(json).unwrap();
        let f = table.get("sliced").unwrap();
        assert_eq!(f.mode, SliceMode::FixedCount(4));
        assert_eq!(f.chroma, ChromaFormat::Yuv444);
        assert_eq!(f.digest_alg, DigestAlg::Blake3);
    }

    #[test]
    fn round_trips_through_json() {
        let table = FixtureTable::from_path(golden_path()).unwrap();
        let again = FixtureTable::from_json_str(&table.to_json_pretty().unwrap()).unwrap();
        assert_eq!(table, again);
    }

    #[test]
    fn invalid_records_load_and_fail_on_their_own() {
        let json = r#"{ "fixtures": [
            { "name": "bad", "source": "a.yuv", "expected_digest": "not-hex",
              "width": 0, "height": 16, "frame_rate": 30.0 }
        ] }"#;
        let table = FixtureTable::from_json_str(json).unwrap();
        assert!(table.get("bad").unwrap().validate().is_err());
    }

    #[test]
    fn digest_of_wrong_length_is_rejected() {
        let rec = FixtureRecord::new("x.yuv", "abcd", 16, 16, 30.0);
        assert!(matches!(rec.validate().unwrap_err(), FixtureError::Digest { .. }));
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        let rec = FixtureRecord::new("x.yuv", "da39a3ee5e6b4b0d3255bfef95601890afd80709", 0, 16, 30.0);
        assert!(matches!(rec.validate().unwrap_err(), FixtureError::Invalid { .. }));
    }

    #[test]
    fn zero_slices_are_rejected() {
        let rec = FixtureRecord::new("x.yuv", "da39a3ee5e6b4b0d3255bfef95601890afd80709", 16, 16, 30.0)
            .with_mode(SliceMode::FixedCount(0));
        assert!(rec.validate().is_err());
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let hex = "da39a3ee5e6b4b0d3255bfef95601890afd80709";
        let err = FixtureTable::new(vec![
            FixtureRecord::new("a/clip.yuv", hex, 16, 16, 30.0),
            FixtureRecord::new("b/clip.yuv", hex, 16, 16, 30.0),
        ])
        .unwrap_err();
        assert!(matches!(err, FixtureError::Duplicate(ref n) if n == "clip.yuv"));
    }

    #[test]
    fn malformed_json_is_parse_error() {
        assert!(matches!(
            FixtureTable::from_json_str("{ \"fixtures\": [ { ").unwrap_err(),
            FixtureError::Parse(_)
        ));
    }

    #[test]
    fn missing_table_file_is_read_error() {
        let err = FixtureTable::from_path("no/such/table.json").unwrap_err();
        assert!(matches!(err, FixtureError::Read { .. }));
    }
}
