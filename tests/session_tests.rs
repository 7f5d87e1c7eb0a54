mod common;

use std::io::Cursor;

use subsift::config::Config;
use subsift::errors::InputError;
use subsift::output::{Charset, parse_rows};
use subsift::paginator::Paginator;
use subsift::session::{Session, is_affirmative, parse_result_target, parse_score_threshold};

use common::{ScriptedFetcher, fast_config, network_error, page, post};

const COMMUNITY_PROMPT: &str = "Please enter the subreddit you're interested in: ";
const TARGET_PROMPT: &str = "Please enter the total number of items you want to search: ";
const THRESHOLD_PROMPT: &str = "Please enter the minimum score threshold for your results: ";

/// Run a whole session over `input` and return what it printed.
async fn run_session(fetcher: &ScriptedFetcher, config: &Config, input: &str) -> String {
    let mut out = Vec::new();
    {
        let paginator = Paginator::new(fetcher, config);
        let mut session = Session::new(Cursor::new(input.as_bytes()), &mut out, paginator, config);
        session.run().await.unwrap();
    }
    String::from_utf8(out).unwrap()
}

fn borrow_pages() -> Vec<String> {
    vec![
        page(&[
            post("120", "Understanding the borrow checker", "/a"),
            post("20", "borrow for beginners", "/low"),
        ]),
        page(&[post("75", "Category theory for rustaceans", "/c")]),
    ]
}

mod single_run {
    use super::*;

    #[tokio::test]
    async fn test_prints_matching_rows() {
        let fetcher = ScriptedFetcher::pages(borrow_pages());
        let printed = run_session(
            &fetcher,
            &fast_config(),
            "programming\nrust\nborrow\n25\n50\nn\n",
        )
        .await;

        assert_eq!(fetcher.offsets(), vec!["0", "25"]);
        assert!(printed.contains("[120] Understanding the borrow checker"));
        assert!(printed.contains("https://old.reddit.com/a"));
        assert!(!printed.contains("borrow for beginners"));
        assert!(printed.contains("1 result(s) from 2 page(s)."));
        assert_eq!(printed.matches(COMMUNITY_PROMPT).count(), 1);
    }

    #[tokio::test]
    async fn test_no_results_message() {
        let fetcher = ScriptedFetcher::default();
        let printed = run_session(
            &fetcher,
            &fast_config(),
            "programming\nrust\nborrow\n0\n50\n\n",
        )
        .await;

        assert!(printed.contains("The search produced no results after 1 page(s)"));
        assert!(!printed.contains("Search failed"));
    }

    #[tokio::test]
    async fn test_failure_is_reported_not_fatal() {
        let fetcher = ScriptedFetcher::new(vec![Err(network_error(
            "https://old.reddit.com/r/programming/search",
        ))]);
        let printed = run_session(
            &fetcher,
            &fast_config(),
            "programming\nrust\nborrow\n0\n50\nn\n",
        )
        .await;

        assert!(printed.contains("Search failed: request to https://old.reddit.com/r/programming/search failed"));
        assert!(!printed.contains("no results"));
    }
}

mod reprompting {
    use super::*;

    #[tokio::test]
    async fn test_bad_number_reprompts_only_that_field() {
        let fetcher = ScriptedFetcher::default();
        let printed = run_session(
            &fetcher,
            &fast_config(),
            "programming\nrust\nborrow\nlots\n25\nhigh\n50\nn\n",
        )
        .await;

        assert!(printed.contains("number of results must be a whole number, got \"lots\""));
        assert!(printed.contains("score threshold must be a whole number, got \"high\""));
        assert_eq!(printed.matches(COMMUNITY_PROMPT).count(), 1);
        assert_eq!(printed.matches(TARGET_PROMPT).count(), 2);
        assert_eq!(printed.matches(THRESHOLD_PROMPT).count(), 2);
        assert_eq!(fetcher.offsets(), vec!["0", "25"]);
    }

    #[tokio::test]
    async fn test_negative_target_is_rejected() {
        let fetcher = ScriptedFetcher::default();
        let printed = run_session(
            &fetcher,
            &fast_config(),
            "programming\nrust\nborrow\n-5\n0\n10\nn\n",
        )
        .await;

        assert!(printed.contains("number of results cannot be negative, got -5"));
        assert_eq!(fetcher.offsets(), vec!["0"]);
    }

    #[tokio::test]
    async fn test_blank_community_is_asked_again() {
        let fetcher = ScriptedFetcher::default();
        let printed = run_session(
            &fetcher,
            &fast_config(),
            "\nprogramming\nrust\n\n0\n10\nn\n",
        )
        .await;

        assert!(printed.contains("community cannot be empty"));
        assert_eq!(printed.matches(COMMUNITY_PROMPT).count(), 2);
        assert_eq!(fetcher.calls(), 1);
    }
}

mod looping {
    use super::*;

    #[tokio::test]
    async fn test_yes_starts_another_search() {
        let fetcher = ScriptedFetcher::new(vec![
            Err(network_error("https://old.reddit.com/r/programming/search")),
            Ok(page(&[post("90", "borrow again", "/again")])),
        ]);
        let printed = run_session(
            &fetcher,
            &fast_config(),
            "programming\nrust\nborrow\n0\n50\nY\nprogramming\nrust\nborrow\n0\n50\nno\n",
        )
        .await;

        assert_eq!(printed.matches(COMMUNITY_PROMPT).count(), 2);
        assert!(printed.contains("Search failed"));
        assert!(printed.contains("[90] borrow again"));
        assert_eq!(fetcher.calls(), 2);
    }

    #[tokio::test]
    async fn test_input_ending_mid_prompt_ends_session() {
        let fetcher = ScriptedFetcher::default();
        let printed = run_session(&fetcher, &fast_config(), "programming\nrust\n").await;

        assert_eq!(fetcher.calls(), 0);
        assert!(printed.ends_with("Please enter the specific keyword you would like to monitor: "));
    }

    #[tokio::test]
    async fn test_input_ending_at_continue_prompt_ends_session() {
        let fetcher = ScriptedFetcher::default();
        run_session(&fetcher, &fast_config(), "programming\nrust\nborrow\n0\n0\n").await;

        assert_eq!(fetcher.calls(), 1);
    }
}

mod saving {
    use super::*;

    #[tokio::test]
    async fn test_results_saved_when_path_configured() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Results.csv");
        let config = Config {
            output_path: Some(path.clone()),
            ..fast_config()
        };
        let fetcher = ScriptedFetcher::pages(borrow_pages());

        let printed = run_session(&fetcher, &config, "programming\nrust\nborrow\n25\n50\nn\n").await;

        assert!(printed.contains("Saved 1 row(s) to"));
        let rows = parse_rows(&std::fs::read_to_string(&path).unwrap());
        assert_eq!(
            rows,
            vec![
                vec!["URL", "Title", "Rating"],
                vec![
                    "https://old.reddit.com/a",
                    "Understanding the borrow checker",
                    "120"
                ],
            ]
        );
    }

    #[tokio::test]
    async fn test_ascii_output_reports_dropped_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Results.csv");
        let config = Config {
            output_path: Some(path.clone()),
            output_charset: Charset::Ascii,
            ..fast_config()
        };
        let fetcher = ScriptedFetcher::pages(vec![page(&[
            post("90", "borrow plain", "/plain"),
            post("90", "borrow – fancy", "/fancy"),
        ])]);

        let printed = run_session(&fetcher, &config, "programming\nrust\nborrow\n0\n50\nn\n").await;

        assert!(printed.contains("[90] borrow – fancy"));
        assert!(printed.contains("Saved 1 row(s)"));
        assert!(printed.contains("1 row(s) were not ASCII"));
    }

    #[tokio::test]
    async fn test_nothing_saved_without_path() {
        let fetcher = ScriptedFetcher::pages(borrow_pages());
        let printed = run_session(
            &fetcher,
            &fast_config(),
            "programming\nrust\nborrow\n25\n50\nn\n",
        )
        .await;

        assert!(!printed.contains("Saved"));
    }
}

mod answers {
    use super::*;

    #[test]
    fn test_affirmative_tokens() {
        for yes in ["y", "Y", "yes", " YES "] {
            assert!(is_affirmative(yes), "{yes:?}");
        }
        for no in ["", "n", "no", "yep", "q"] {
            assert!(!is_affirmative(no), "{no:?}");
        }
    }

    #[test]
    fn test_result_target_parsing() {
        assert_eq!(parse_result_target(" 25 ").unwrap(), 25);
        assert_eq!(parse_result_target("0").unwrap(), 0);
        assert!(matches!(
            parse_result_target("ten"),
            Err(InputError::NotAnInteger { field: "number of results", .. })
        ));
        assert!(matches!(
            parse_result_target("-1"),
            Err(InputError::Negative { value: -1, .. })
        ));
        assert!(matches!(
            parse_result_target("99999999999"),
            Err(InputError::Invalid { .. })
        ));
        assert!(matches!(
            parse_result_target(""),
            Err(InputError::Empty { .. })
        ));
    }

    #[test]
    fn test_score_threshold_parsing() {
        assert_eq!(parse_score_threshold("-10").unwrap(), -10);
        assert_eq!(parse_score_threshold("50").unwrap(), 50);
        assert!(matches!(
            parse_score_threshold("5.5"),
            Err(InputError::NotAnInteger { field: "score threshold", .. })
        ));
    }
}
