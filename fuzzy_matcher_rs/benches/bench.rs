use divan::Bencher;
use fuzzy_matcher_rs::{FuzzyMatcher, MatchMode, MatcherConfig};

const WORD_LIST_SIZE_LIST: &[usize] = &[100, 1000, 10000];
const MODE_LIST: &[&str] = &["char", "pinyin", "hybrid"];

const DEFAULT_WORD_LIST_SIZE: usize = 1000;

const CN_CHARS: &[char] = &[
    '北', '京', '南', '海', '中', '国', '明', '天', '文', '字', '大', '学', '生', '电', '脑',
    '手', '机', '匹', '配', '模',
];

/// Deterministic mixed Chinese/English word list.
fn build_word_list(size: usize) -> Vec<String> {
    (0..size)
        .map(|index| {
            if index % 2 == 0 {
                let mut word = String::new();
                let mut seed = index / 2;
                for _ in 0..3 {
                    word.push(CN_CHARS[seed % CN_CHARS.len()]);
                    seed = seed / CN_CHARS.len() + 7;
                }
                word.push_str(&format!("{index:04}"));
                word
            } else {
                format!("word{index:06}")
            }
        })
        .collect()
}

fn build_matcher(word_list_size: usize) -> FuzzyMatcher {
    let word_list = build_word_list(word_list_size);
    let mut matcher = FuzzyMatcher::new(MatcherConfig::default()).unwrap();
    matcher.build(&word_list).unwrap();
    matcher
}

mod build {
    use super::*;

    #[divan::bench(args = WORD_LIST_SIZE_LIST, max_time = 5)]
    fn build_by_word_list_size(bencher: Bencher, word_list_size: usize) {
        let word_list = build_word_list(word_list_size);

        bencher.bench(|| {
            let mut matcher = FuzzyMatcher::new(MatcherConfig::default()).unwrap();
            matcher.build(&word_list).unwrap();
        });
    }
}

mod match_text {
    use super::*;

    #[divan::bench(args = MODE_LIST, max_time = 5)]
    fn match_text_by_mode(bencher: Bencher, mode: &str) {
        let mode: MatchMode = mode.parse().unwrap();
        let matcher = build_matcher(DEFAULT_WORD_LIST_SIZE);

        bencher.bench(|| matcher.match_text("beijing", mode).unwrap());
    }

    #[divan::bench(args = WORD_LIST_SIZE_LIST, max_time = 5)]
    fn match_text_by_word_list_size(bencher: Bencher, word_list_size: usize) {
        let matcher = build_matcher(word_list_size);

        bencher.bench(|| matcher.match_text("北京明天", MatchMode::Hybrid).unwrap());
    }
}

mod mutate {
    use super::*;

    #[divan::bench(max_time = 5)]
    fn add_remove_word(bencher: Bencher) {
        let mut matcher = build_matcher(DEFAULT_WORD_LIST_SIZE);

        bencher.bench_local(|| {
            matcher.add_word("上海").unwrap();
            matcher.remove_word("上海").unwrap();
        });
    }
}

fn main() {
    divan::main();
}
