//! `comparator`：逐字符比较已输入内容与目标单词（大小写不敏感）。

/// 比较结果。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// 已输入内容是目标单词的前缀（含空输入）
    Continue,
    /// 已输入内容与目标单词完全一致
    Complete,
    /// 第 n 个字符处出现分歧
    Mismatch(usize),
}

/// 下标按输入的字符计；单个字符小写后可能展开为多个字符，整体比较。
pub fn compare(input: &str, target: &str) -> Comparison {
    let mut expected = target.chars();
    for (index, typed) in input.chars().enumerate() {
        match expected.next() {
            // 输入比目标长：在目标末尾处分歧
            None => return Comparison::Mismatch(index),
            Some(want) if !typed.to_lowercase().eq(want.to_lowercase()) => {
                return Comparison::Mismatch(index);
            }
            Some(_) => {}
        }
    }
    if expected.next().is_none() {
        Comparison::Complete
    } else {
        Comparison::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_continues() {
        assert_eq!(compare("", "apple"), Comparison::Continue);
        assert_eq!(compare("app", "apple"), Comparison::Continue);
    }

    #[test]
    fn exact_match_completes() {
        assert_eq!(compare("apple", "apple"), Comparison::Complete);
    }

    #[test]
    fn case_is_ignored() {
        assert_eq!(compare("APP", "apple"), Comparison::Continue);
        assert_eq!(compare("Apple", "aPPLE"), Comparison::Complete);
    }

    #[test]
    fn reports_first_diverging_index() {
        assert_eq!(compare("apx", "apple"), Comparison::Mismatch(2));
        assert_eq!(compare("x", "apple"), Comparison::Mismatch(0));
    }

    #[test]
    fn overlong_input_mismatches_at_target_end() {
        assert_eq!(compare("apples", "apple"), Comparison::Mismatch(5));
    }

    #[test]
    fn phrases_compare_spaces() {
        assert_eq!(compare("a lot", "a lot"), Comparison::Complete);
        assert_eq!(compare("a-", "a lot"), Comparison::Mismatch(1));
    }

    #[test]
    fn index_counts_typed_chars() {
        // 'İ' 小写后展开为两个字符
        assert_eq!(compare("İx", "İstanbul"), Comparison::Mismatch(1));
        assert_eq!(compare("İS", "İs"), Comparison::Complete);
    }
}
