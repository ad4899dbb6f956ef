use closer::{CloseCtx, CloseError, Closer, Config};
use proptest::prelude::*;
use std::time::Duration;

fn failed_names(plan: &[(bool, u64)], total_ms: u64) -> Vec<String> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .start_paused(true)
        .build()
        .unwrap();

    rt.block_on(async {
        let closer = Closer::new(Config::new(Duration::from_millis(total_ms), Duration::ZERO));
        for (i, &(fail, delay)) in plan.iter().enumerate() {
            closer
                .register(format!("t{i}"), move |_ctx: CloseCtx| async move {
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                    if fail {
                        Err(CloseError::failed("refused"))
                    } else {
                        Ok(())
                    }
                })
                .unwrap();
        }
        let names: Vec<String> = closer
            .close()
            .await
            .failed()
            .into_iter()
            .map(str::to_string)
            .collect();
        names
    })
}

proptest! {
    #[test]
    fn failed_set_ignores_completion_order(
        plan in prop::collection::vec((any::<bool>(), 0u64..200), 1..12)
    ) {
        let expected: Vec<String> = plan
            .iter()
            .enumerate()
            .filter(|(_, (fail, _))| *fail)
            .map(|(i, _)| format!("t{i}"))
            .collect();

        prop_assert_eq!(failed_names(&plan, 0), expected.clone());

        // Same outcomes, reversed completion order.
        let max = plan.iter().map(|(_, d)| *d).max().unwrap_or(0);
        let reversed: Vec<_> = plan.iter().map(|&(f, d)| (f, max - d)).collect();
        prop_assert_eq!(failed_names(&reversed, 0), expected);
    }

    #[test]
    fn global_budget_fails_exactly_the_slow_tasks(
        delays in prop::collection::vec(prop_oneof![0u64..140, 161u64..300], 1..10)
    ) {
        let plan: Vec<_> = delays.iter().map(|&d| (false, d)).collect();
        let expected: Vec<String> = delays
            .iter()
            .enumerate()
            .filter(|(_, d)| **d > 150)
            .map(|(i, _)| format!("t{i}"))
            .collect();

        prop_assert_eq!(failed_names(&plan, 150), expected);
    }
}
