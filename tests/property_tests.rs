use proptest::prelude::*;

use sawmill::stats::AggregateStats;
use sawmill::parse_line;

prop_compose! {
    fn valid_line()(
        method in "[A-Z]{1,7}",
        path in "/[a-zA-Z0-9_/.-]{0,24}",
        status in 100u16..=599,
        time_whole in 0u32..1000,
        time_frac in 0u32..10,
        agent in "[!-~]([ -~]{0,28}[!-~])?",
    ) -> (String, String, String, u16, String, String) {
        let time = format!("{time_whole}.{time_frac}");
        let line = format!("[{method}] {path}, status={status}, time={time}ms user-agent={agent}");
        (line, method, path, status, time, agent)
    }
}

proptest! {
    #[test]
    fn valid_lines_round_trip((line, method, path, status, time, agent) in valid_line()) {
        let rec = parse_line(&line).expect("generated line must match the grammar");
        prop_assert_eq!(rec.method, method);
        prop_assert_eq!(rec.path, path);
        prop_assert_eq!(rec.status, status);
        prop_assert_eq!(
            rec.status_class,
            format!("{}xx", status.to_string().chars().next().unwrap())
        );
        prop_assert_eq!(rec.latency_ms, time.parse::<f64>().unwrap());
        prop_assert_eq!(rec.user_agent, agent);
    }

    #[test]
    fn recording_any_batch_preserves_the_invariant(lines in prop::collection::vec(valid_line(), 0..50)) {
        let mut stats = AggregateStats::new();
        for (line, ..) in &lines {
            stats.record(&parse_line(line).unwrap());
        }
        let snap = stats.snapshot();
        prop_assert!(snap.invariant_holds());
        prop_assert_eq!(snap.total_records, lines.len() as u64);
    }

    #[test]
    fn lines_without_bracketed_method_never_match(noise in "[!-Z\\]-~][ -~]{0,40}") {
        prop_assert!(parse_line(&noise).is_none());
    }
}
