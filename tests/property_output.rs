//! Property tests for the output collector: per-stream order survives any
//! interleaving, and exactly the stderr lines are marked.

use proptest::prelude::*;

use leash::output::{OutputCollector, StreamSource, STDERR_MARK};

fn source_of(is_err: bool) -> StreamSource {
    if is_err {
        StreamSource::Stderr
    } else {
        StreamSource::Stdout
    }
}

proptest! {
    #[test]
    fn per_stream_order_is_preserved(ops in proptest::collection::vec(any::<(bool, u8)>(), 0..64)) {
        let collector = OutputCollector::new();
        let mut want_out = Vec::new();
        let mut want_err = Vec::new();

        for (i, (is_err, tag)) in ops.iter().enumerate() {
            let text = format!("line-{i}-{tag}");
            collector.push(source_of(*is_err), &text);
            if *is_err {
                want_err.push(text);
            } else {
                want_out.push(text);
            }
        }

        let lines = collector.take_lines();
        prop_assert_eq!(lines.len(), ops.len());

        let got_out: Vec<_> = lines
            .iter()
            .filter(|l| l.source == StreamSource::Stdout)
            .map(|l| l.text.clone())
            .collect();
        let got_err: Vec<_> = lines
            .iter()
            .filter(|l| l.source == StreamSource::Stderr)
            .map(|l| l.text.clone())
            .collect();

        prop_assert_eq!(got_out, want_out);
        prop_assert_eq!(got_err, want_err);
    }

    #[test]
    fn exactly_stderr_lines_are_marked(ops in proptest::collection::vec(any::<bool>(), 0..64)) {
        let collector = OutputCollector::new();
        for (i, is_err) in ops.iter().enumerate() {
            collector.push(source_of(*is_err), &format!("l{i}"));
        }

        for line in collector.take_lines() {
            let marked = line.rendered().starts_with(STDERR_MARK);
            prop_assert_eq!(marked, line.source == StreamSource::Stderr);
        }
    }
}

/// Two writers hammering the collector concurrently: totals and per-stream
/// order must still hold.
#[test]
fn concurrent_pushers_keep_per_stream_order() {
    let collector = OutputCollector::new();
    const N: usize = 500;

    let out_side = {
        let collector = collector.clone();
        std::thread::spawn(move || {
            for i in 0..N {
                collector.push(StreamSource::Stdout, &format!("out-{i}"));
            }
        })
    };
    let err_side = {
        let collector = collector.clone();
        std::thread::spawn(move || {
            for i in 0..N {
                collector.push(StreamSource::Stderr, &format!("err-{i}"));
            }
        })
    };
    out_side.join().unwrap();
    err_side.join().unwrap();

    let lines = collector.take_lines();
    assert_eq!(lines.len(), 2 * N);

    let got_out: Vec<_> = lines
        .iter()
        .filter(|l| l.source == StreamSource::Stdout)
        .map(|l| l.text.clone())
        .collect();
    let got_err: Vec<_> = lines
        .iter()
        .filter(|l| l.source == StreamSource::Stderr)
        .map(|l| l.text.clone())
        .collect();

    assert_eq!(got_out, (0..N).map(|i| format!("out-{i}")).collect::<Vec<_>>());
    assert_eq!(got_err, (0..N).map(|i| format!("err-{i}")).collect::<Vec<_>>());
}
