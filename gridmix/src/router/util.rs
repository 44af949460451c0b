use std::time::Duration;

use gridmix_core::GridmixError;

/// Join fallible tasks, failing fast, under an optional request-level deadline.
///
/// This wraps `futures::future::try_join_all(tasks)` with
/// `crate::core::with_request_deadline`. Results keep the input order. On
/// timeout the helper returns `GridmixError::RequestTimeout` labelled with
/// `capability`.
pub async fn try_join_with_deadline<I, F, T>(
    capability: &'static str,
    tasks: I,
    deadline: Option<Duration>,
) -> Result<Vec<T>, GridmixError>
where
    I: IntoIterator<Item = F>,
    F: core::future::Future<Output = Result<T, GridmixError>>,
{
    crate::core::with_request_deadline(deadline, futures::future::try_join_all(tasks))
        .await
        .map_err(|_| GridmixError::request_timeout(capability))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn keeps_input_order() {
        let tasks = (0..4u64).map(|i| async move {
            tokio::time::sleep(Duration::from_millis(20 - 5 * i)).await;
            Ok::<_, GridmixError>(i)
        });
        let out = try_join_with_deadline("test", tasks, None).await.unwrap();
        assert_eq!(out, vec![0, 1, 2, 3]);
    }

    #[tokio::test]
    async fn first_failure_fails_the_batch() {
        let tasks = (0..3u32).map(|i| async move {
            if i == 1 {
                Err(GridmixError::Other("boom".into()))
            } else {
                Ok(i)
            }
        });
        let err = try_join_with_deadline("test", tasks, None).await.unwrap_err();
        assert_eq!(err, GridmixError::Other("boom".into()));
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_maps_to_capability() {
        let tasks = vec![async {
            std::future::pending::<()>().await;
            Ok::<u8, GridmixError>(0)
        }];
        let err = try_join_with_deadline("fetch_bundle", tasks, Some(Duration::from_millis(10)))
            .await
            .unwrap_err();
        assert_eq!(err, GridmixError::request_timeout("fetch_bundle"));
    }
}
