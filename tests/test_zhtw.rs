use zhtw::{Converter, Finding, Span, TermTable};

#[cfg(test)]
mod tests {
    use super::*;

    fn builtin() -> Converter {
        Converter::builtin().unwrap()
    }

    #[test]
    fn convert_software_terms_test() {
        let input = "用户使用软件";
        let expected_output = "使用者使用軟體";
        let zhtw = builtin();
        let actual_output = zhtw.convert(input);
        assert_eq!(actual_output, expected_output);
    }

    #[test]
    fn convert_one_to_many_characters_test() {
        let zhtw = builtin();
        let cases = [
            ("发送头发图片", "傳送頭髮圖片"),
            ("面试之后吃面条", "面試之後吃麵條"),
            ("复杂的恢复过程", "複雜的還原過程"),
            ("测试时间是10公里", "測試時間是10公里"),
        ];
        for (input, expected_output) in cases {
            assert_eq!(zhtw.convert(input), expected_output, "input: {input}");
        }
    }

    #[test]
    fn identity_terms_are_untouched_test() {
        let zhtw = builtin();
        for input in ["皇后", "茶几", "公里", "批准"] {
            assert_eq!(zhtw.convert(input), input);
            assert!(!zhtw.has_matches(input));
        }
        assert_eq!(zhtw.convert("之后"), "之後");
    }

    #[test]
    fn hong_kong_terms_test() {
        let zhtw = builtin();
        assert_eq!(zhtw.convert("中文檔案"), "中文檔案");
        assert_eq!(zhtw.convert("這份文檔"), "這份文件");
    }

    #[test]
    fn longest_match_test() {
        let zhtw = builtin();
        assert_eq!(zhtw.convert("我们的数据库和文档"), "我们的資料庫和文件");
        assert_eq!(zhtw.count_matches("我们的数据库和文档"), 2);
    }

    #[test]
    fn no_op_stability_test() {
        let zhtw = builtin();
        let input = "fn main() {\n    println!(\"已經是臺灣用語\");\n}\n";
        assert_eq!(zhtw.convert(input), input);
        assert!(zhtw.check(input).is_empty());
    }

    #[test]
    fn idempotence_test() {
        let zhtw = builtin();
        let input = "这个软件需要优化。用户的数据库出现问题，请发送测试报告。\n\
                     面试之后吃面条，皇后在这里批准了。复杂的恢复过程。";
        let once = zhtw.convert(input);
        let twice = zhtw.convert(&once);
        assert_ne!(once, input);
        assert_eq!(twice, once);
    }

    #[test]
    fn every_builtin_target_is_stable_test() {
        let zhtw = builtin();
        for term in zhtw.table().terms() {
            let converted = zhtw.convert(&term.source);
            assert_eq!(zhtw.convert(&converted), converted, "term: {}", term.source);
        }
    }

    #[test]
    fn check_reports_line_column_and_context_test() {
        let zhtw = builtin();
        let input = "第一行\n软件在這裡";
        let issues = zhtw.check(input);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].line, 2);
        assert_eq!(issues[0].column, 1);
        assert_eq!(issues[0].source, "软件");
        assert_eq!(issues[0].target, "軟體");
        assert_eq!(issues[0].context, "第一行 软件在這裡");
    }

    #[test]
    fn ignore_ranges_test() {
        let zhtw = builtin();
        // second line is inside a disabled region
        let input = "用户\n用户\n用户";
        let ignore = [Span::new(3, 5)];
        assert_eq!(
            zhtw.convert_with_ignore(input, &ignore),
            "使用者\n用户\n使用者"
        );
        let lines: Vec<_> = zhtw
            .check_with_ignore(input, &ignore)
            .iter()
            .map(|i| i.line)
            .collect();
        assert_eq!(lines, vec![1, 3]);
    }

    #[test]
    fn issues_serialize_to_json_test() {
        let zhtw = builtin();
        let issues = zhtw.check("软件");
        let json = serde_json::to_value(&issues).unwrap();
        assert_eq!(json[0]["line"], 1);
        assert_eq!(json[0]["target"], "軟體");
    }

    #[test]
    fn builtin_validates_clean_test() {
        let zhtw = builtin();
        let findings = zhtw.validate(false);
        assert!(findings.is_empty(), "{findings:?}");
        assert!(!zhtw.validate(true).iter().any(Finding::is_error));
    }

    #[test]
    fn builtin_statistics_test() {
        let zhtw = builtin();
        let counts: Vec<_> = zhtw
            .table()
            .origin_counts()
            .into_iter()
            .map(|(origin, _)| origin.to_string())
            .collect();
        assert_eq!(counts, vec!["cn/base", "cn/chars", "hk/base"]);

        let stats = zhtw.statistics("软件、软件和用户");
        assert_eq!(stats.total, 3);
        assert_eq!(stats.by_source["软件"], 2);
    }

    #[test]
    fn batch_parallel_test() {
        let mut zhtw = builtin();
        let texts: Vec<String> = (0..64)
            .map(|i| format!("第{i}个用户使用软件"))
            .collect();

        let parallel = zhtw.convert_batch(&texts);
        zhtw.set_parallel(false);
        let sequential = zhtw.convert_batch(&texts);
        assert_eq!(parallel, sequential);
        assert!(parallel.iter().all(|t| t.ends_with("使用者使用軟體")));

        let stats = zhtw.statistics_batch(&texts);
        assert_eq!(stats.total, 128);
    }

    #[test]
    fn converter_is_send_and_sync_test() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Converter>();
        assert_send_sync::<TermTable>();
    }
}
