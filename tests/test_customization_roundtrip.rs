#[cfg(test)]
mod tests {
    use lac_fmmseg::config::Config;
    use lac_fmmseg::dictionary_lib::Customization;
    use lac_fmmseg::tag::{parse_tags, Tag};
    use lac_fmmseg::Lac;
    use std::fs;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    type TestResult<T> = Result<T, Box<dyn std::error::Error>>;

    const TEXT: &str = "春天的花开秋天的风以及冬天的落阳";
    const TAGS: &str =
        "TIME-B TIME-I u-B n-B v-I TIME-B TIME-I u-B n-B c-B c-I TIME-B TIME-I u-B LOC-B PER-I";
    const USER_DICT: &str = "春天/SEASON\n\n花/n 开/v\n秋天的风\n   \n落 阳\n";

    fn parse_labels(custom: &Customization) -> Vec<String> {
        let mut tags = parse_tags(TAGS);
        custom.parse(TEXT, &mut tags).unwrap();
        tags.iter().map(Tag::to_string).collect()
    }

    fn write_dict() -> TestResult<NamedTempFile> {
        let mut file = NamedTempFile::new()?;
        file.write_all(USER_DICT.as_bytes())?;
        file.flush()?;
        Ok(file)
    }

    #[test]
    fn load_from_file_matches_in_memory_load() -> TestResult<()> {
        let file = write_dict()?;
        let from_file = Customization::from_file(file.path())?;

        let mut in_memory = Customization::new();
        in_memory.load_from_str(USER_DICT);

        assert_eq!(from_file.len(), 4);
        assert_eq!(parse_labels(&from_file), parse_labels(&in_memory));
        Ok(())
    }

    #[test]
    fn loading_the_same_file_twice_is_idempotent() -> TestResult<()> {
        let file = write_dict()?;
        let mut custom = Customization::from_file(file.path())?;
        let once = parse_labels(&custom);
        custom.load_from_file(file.path())?;
        assert_eq!(custom.len(), 4);
        assert_eq!(parse_labels(&custom), once);
        assert_eq!(custom.trie().search(TEXT), {
            let fresh = Customization::from_file(file.path())?;
            fresh.trie().search(TEXT)
        });
        Ok(())
    }

    #[test]
    fn compressed_roundtrip_preserves_behavior() -> TestResult<()> {
        let dir = tempdir()?;
        let path = dir.path().join("user_dict.zstd");

        let mut custom = Customization::new();
        custom.load_from_str(USER_DICT);
        custom.save_compressed(&path)?;
        assert!(fs::metadata(&path)?.len() > 0);

        let restored = Customization::load_compressed(&path)?;
        assert_eq!(restored.len(), custom.len());
        assert_eq!(restored.trie().len(), custom.trie().len());
        assert_eq!(restored.templates("花开"), custom.templates("花开"));
        assert_eq!(parse_labels(&restored), parse_labels(&custom));
        Ok(())
    }

    #[test]
    fn cbor_roundtrip_preserves_behavior() -> TestResult<()> {
        let dir = tempdir()?;
        let path = dir.path().join("user_dict.cbor");

        let mut custom = Customization::new();
        custom.load_from_str(USER_DICT);
        custom.serialize_to_cbor(&path)?;

        let restored = Customization::deserialize_from_cbor(&path)?;
        assert_eq!(parse_labels(&restored), parse_labels(&custom));
        Ok(())
    }

    #[test]
    fn analyzer_from_config_loads_all_resources() -> TestResult<()> {
        let dir = tempdir()?;
        let dict_path = dir.path().join("custom.dic");
        let vocab_path = dir.path().join("tag.dic");
        let q2b_path = dir.path().join("q2b.dic");
        fs::write(&dict_path, "想法/IDEA\n")?;
        fs::write(&vocab_path, "0\tr-B\n1\tu-B\n2\tn-B\n3\tn-I\n")?;
        fs::write(&q2b_path, "Ａ\tA\n")?;

        let config_path = dir.path().join("lac.toml");
        fs::write(
            &config_path,
            format!(
                "user_dict = {:?}\ntag_vocab = {:?}\nq2b_vocab = {:?}\nparallel = false\n",
                dict_path.display().to_string(),
                vocab_path.display().to_string(),
                q2b_path.display().to_string(),
            ),
        )?;

        let config = Config::load_toml(&config_path)?;
        let lac = Lac::from_config(&config)?;
        assert!(!lac.get_parallel());
        assert_eq!(lac.normalize("Ａ的"), "A的");

        let segments = lac.analyze_ids("我的想法", &[0, 1, 2, 3])?;
        assert_eq!(segments.words(), vec!["我", "的", "想法"]);
        assert_eq!(segments.poss(), vec!["r", "u", "IDEA"]);
        Ok(())
    }

    #[test]
    fn analyzer_from_config_prefers_compiled_dict_when_no_text_dict() -> TestResult<()> {
        let dir = tempdir()?;
        let compiled = dir.path().join("user_dict.zstd");
        let mut custom = Customization::new();
        custom.load_from_str("春天/SEASON");
        custom.save_compressed(&compiled)?;

        let config = Config {
            compiled_dict: Some(compiled),
            ..Config::default()
        };
        let lac = Lac::from_config(&config)?;
        let segments = lac.analyze("春天", parse_tags("TIME-B TIME-I"))?;
        assert_eq!(segments.poss(), vec!["SEASON"]);
        Ok(())
    }

    #[test]
    fn missing_resource_fails_from_config() {
        let config = Config {
            user_dict: Some("no/such/custom.dic".into()),
            ..Config::default()
        };
        assert!(Lac::from_config(&config).is_err());
    }
}
