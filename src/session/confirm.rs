use super::{ConfirmReport, ConfirmStatus, SessionScoreBuffer, SubmissionFailure};
use crate::error::QuiverError;
use crate::store::ScoreStore;
use crate::types::config::FailedSubmissionPolicy;
use crate::types::geometry::SessionShot;
use std::collections::{BTreeMap, BTreeSet};

impl SessionScoreBuffer {
    /// Submits every pending shot under `container_id` to `store`.
    ///
    /// Shots go out one at a time in sequence order; a refused shot is counted and the loop
    /// moves on. Shots on arrows the store no longer lists are counted as failures without
    /// being submitted. Afterwards the quiver's entry is cleared, except that under
    /// [`FailedSubmissionPolicy::Retain`] refused shots are put back with their sequences.
    pub fn confirm<S>(&self, container_id: &str, store: &mut S) -> ConfirmReport
    where
        S: ScoreStore + ?Sized,
    {
        let (epoch, drained) = self.drain_pending(container_id);
        if drained.is_empty() {
            tracing::info!(container = container_id, "nothing to confirm");
            return ConfirmReport::nothing_to_confirm(container_id);
        }

        let known_items = known_items(store, container_id);
        let mut success_count = 0;
        let mut failures = Vec::new();
        let mut refused: BTreeMap<String, Vec<SessionShot>> = BTreeMap::new();

        for (item_id, shots) in drained {
            if let Some(known) = &known_items {
                if !known.contains(&item_id) {
                    tracing::warn!(
                        container = container_id,
                        item = %item_id,
                        shots = shots.len(),
                        "arrow no longer exists; dropping its session scores"
                    );
                    failures.extend(shots.iter().map(|shot| SubmissionFailure {
                        item_id: item_id.clone(),
                        sequence: shot.sequence,
                        reason: QuiverError::UnknownItem(item_id.clone()).to_string(),
                        orphaned: true,
                    }));
                    continue;
                }
            }

            for shot in shots {
                match store.submit_score(&item_id, &shot) {
                    Ok(_) => success_count += 1,
                    Err(error) => {
                        tracing::warn!(
                            container = container_id,
                            item = %item_id,
                            sequence = shot.sequence,
                            error = %error,
                            "score submission failed"
                        );
                        failures.push(SubmissionFailure {
                            item_id: item_id.clone(),
                            sequence: shot.sequence,
                            reason: error.to_string(),
                            orphaned: false,
                        });
                        refused.entry(item_id.clone()).or_default().push(shot);
                    }
                }
            }
        }

        if self.policy == FailedSubmissionPolicy::Drop {
            refused.clear();
        }
        let retained = self.settle(container_id, epoch, refused);

        let error_count = failures.len();
        let status = ConfirmStatus::from_counts(success_count, error_count);
        tracing::info!(
            container = container_id,
            success_count,
            error_count,
            retained,
            status = status.as_str(),
            "session scores confirmed"
        );
        ConfirmReport {
            container_id: container_id.to_string(),
            status,
            success_count,
            error_count,
            failures,
            retained,
        }
    }

    /// Takes every non-empty lane's shots out of the quiver, leaving the lanes and their
    /// sequence counters behind so shots appended mid-confirm keep counting upward.
    fn drain_pending(&self, container_id: &str) -> (u64, Vec<(String, Vec<SessionShot>)>) {
        let mut containers = self.containers.lock();
        let Some(entry) = containers.get_mut(container_id) else {
            return (0, Vec::new());
        };
        let drained = entry
            .items
            .iter_mut()
            .filter(|(_, lane)| !lane.shots.is_empty())
            .map(|(item_id, lane)| (item_id.clone(), std::mem::take(&mut lane.shots)))
            .collect();
        (entry.epoch, drained)
    }

    /// Puts refused shots back ahead of anything appended meanwhile, then drops empty lanes
    /// and, if nothing is left, the quiver itself. Returns how many shots went back.
    ///
    /// If the quiver was discarded while its shots were out, nothing is put back.
    fn settle(
        &self,
        container_id: &str,
        epoch: u64,
        refused: BTreeMap<String, Vec<SessionShot>>,
    ) -> usize {
        let mut containers = self.containers.lock();
        let Some(entry) = containers
            .get_mut(container_id)
            .filter(|entry| entry.epoch == epoch)
        else {
            if !refused.is_empty() {
                tracing::info!(
                    container = container_id,
                    "quiver discarded during confirm; refused shots not kept"
                );
            }
            return 0;
        };

        let mut retained = 0;
        for (item_id, mut shots) in refused {
            retained += shots.len();
            let lane = entry.items.entry(item_id).or_default();
            let newest = shots.last().map(|shot| shot.sequence).unwrap_or(0);
            lane.last_sequence = lane.last_sequence.max(newest);
            shots.append(&mut lane.shots);
            lane.shots = shots;
        }

        entry.items.retain(|_, lane| !lane.shots.is_empty());
        if entry.items.is_empty() {
            containers.remove(container_id);
        }
        retained
    }
}

/// Arrow ids the store still lists for the quiver, or `None` when that cannot be determined.
fn known_items<S>(store: &S, container_id: &str) -> Option<BTreeSet<String>>
where
    S: ScoreStore + ?Sized,
{
    match store.list_items(container_id) {
        Ok(items) => Some(items.into_iter().map(|item| item.id).collect()),
        Err(QuiverError::UnknownContainer(_)) => Some(BTreeSet::new()),
        Err(error) => {
            tracing::warn!(
                container = container_id,
                error = %error,
                "could not list arrows; submitting without validation"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::DiscardOutcome;
    use crate::error::Result;
    use crate::store::{Container, Item, MemoryStore, StoredScore};
    use crate::types::geometry::ShotRecord;

    fn record(score: u32) -> ShotRecord {
        ShotRecord {
            x: 61.0,
            y: 61.0,
            score,
        }
    }

    /// One quiver ("1") with arrows "1" and "2".
    fn store_with_two_arrows() -> MemoryStore {
        let mut store = MemoryStore::new();
        let quiver = store.add_container("Indoor").expect("quiver should be added");
        store.add_item(&quiver.id, "A1").expect("arrow should be added");
        store.add_item(&quiver.id, "A2").expect("arrow should be added");
        store
    }

    #[test]
    fn confirm_submits_in_sequence_order_and_clears_the_quiver() {
        let buffer = SessionScoreBuffer::default();
        let mut store = store_with_two_arrows();
        for score in [10, 8, 6] {
            buffer.append("1", "1", record(score)).expect("append should work");
        }
        buffer.undo_last("1", "1");
        buffer.append("1", "1", record(9)).expect("append should work");
        buffer.append("1", "2", record(4)).expect("append should work");

        let report = buffer.confirm("1", &mut store);

        assert_eq!(report.status, ConfirmStatus::Confirmed);
        assert_eq!((report.success_count, report.error_count), (4, 0));
        assert_eq!(
            store.submissions(),
            &[
                ("1".to_string(), 1),
                ("1".to_string(), 2),
                ("1".to_string(), 4),
                ("2".to_string(), 1),
            ]
        );
        let values = store
            .stored_scores()
            .iter()
            .map(|score| score.value)
            .collect::<Vec<_>>();
        assert_eq!(values, vec![10, 8, 9, 4]);
        assert!(buffer.container_ids().is_empty());
    }

    #[test]
    fn one_failing_arrow_yields_mixed_result_and_still_clears() {
        let buffer = SessionScoreBuffer::default();
        let mut store = store_with_two_arrows();
        store.fail_item("2");
        buffer.append("1", "1", record(10)).expect("append should work");
        buffer.append("1", "2", record(3)).expect("append should work");

        let report = buffer.confirm("1", &mut store);

        assert_eq!(report.status, ConfirmStatus::Mixed);
        assert_eq!((report.success_count, report.error_count), (1, 1));
        assert_eq!(report.retained, 0);
        assert_eq!(report.failures[0].item_id, "2");
        assert!(!report.failures[0].orphaned);
        assert_eq!(buffer.pending_count("1"), 0);
        assert!(buffer.container_ids().is_empty());
    }

    #[test]
    fn a_failed_record_does_not_stop_later_records() {
        let buffer = SessionScoreBuffer::default();
        let mut store = store_with_two_arrows();
        store.fail_shot("1", 2);
        for score in [10, 9, 8] {
            buffer.append("1", "1", record(score)).expect("append should work");
        }

        let report = buffer.confirm("1", &mut store);

        assert_eq!((report.success_count, report.error_count), (2, 1));
        assert_eq!(store.submissions().len(), 3);
        assert_eq!(report.failures[0].sequence, 2);
    }

    #[test]
    fn all_failed_is_reported_and_the_quiver_is_cleared() {
        let buffer = SessionScoreBuffer::default();
        let mut store = store_with_two_arrows();
        store.fail_item("1");
        buffer.append("1", "1", record(10)).expect("append should work");
        buffer.append("1", "1", record(9)).expect("append should work");

        let report = buffer.confirm("1", &mut store);

        assert_eq!(report.status, ConfirmStatus::AllFailed);
        assert_eq!((report.success_count, report.error_count), (0, 2));
        assert!(buffer.is_empty());
        assert_eq!(buffer.discard("1"), DiscardOutcome::NothingToDiscard);
    }

    #[test]
    fn retain_policy_requeues_refused_shots_with_their_sequences() {
        let buffer = SessionScoreBuffer::new(FailedSubmissionPolicy::Retain);
        let mut store = store_with_two_arrows();
        store.fail_shot("1", 2);
        for score in [10, 9, 8] {
            buffer.append("1", "1", record(score)).expect("append should work");
        }

        let report = buffer.confirm("1", &mut store);

        assert_eq!(report.status, ConfirmStatus::Mixed);
        assert_eq!(report.retained, 1);
        let pending = buffer.pending("1");
        assert_eq!(pending["1"].len(), 1);
        assert_eq!(pending["1"][0].sequence, 2);
        assert_eq!(pending["1"][0].record.score, 9);

        let next = buffer.append("1", "1", record(7)).expect("append should work");
        assert_eq!(next.sequence, 4);
    }

    #[test]
    fn orphaned_arrow_scores_count_as_failures_without_submission() {
        let buffer = SessionScoreBuffer::new(FailedSubmissionPolicy::Retain);
        let mut store = store_with_two_arrows();
        buffer.append("1", "1", record(10)).expect("append should work");
        buffer.append("1", "2", record(5)).expect("append should work");
        buffer.append("1", "2", record(6)).expect("append should work");
        store.remove_item("2").expect("arrow should be removed");

        let report = buffer.confirm("1", &mut store);

        assert_eq!((report.success_count, report.error_count), (1, 2));
        assert!(report.failures.iter().all(|failure| failure.orphaned));
        assert_eq!(store.submissions(), &[("1".to_string(), 1)]);
        assert_eq!(report.retained, 0);
        assert!(buffer.is_empty());
    }

    #[test]
    fn deleted_quiver_orphans_every_arrow() {
        let buffer = SessionScoreBuffer::default();
        let mut store = MemoryStore::new();
        buffer.append("7", "1", record(10)).expect("append should work");

        let report = buffer.confirm("7", &mut store);

        assert_eq!(report.status, ConfirmStatus::AllFailed);
        assert!(store.submissions().is_empty());
    }

    #[test]
    fn confirm_without_pending_scores_is_a_noop() {
        let buffer = SessionScoreBuffer::default();
        let mut store = store_with_two_arrows();
        assert_eq!(
            buffer.confirm("1", &mut store),
            ConfirmReport::nothing_to_confirm("1")
        );

        buffer.append("1", "1", record(10)).expect("append should work");
        buffer.undo_last("1", "1");
        let report = buffer.confirm("1", &mut store);
        assert_eq!(report.status, ConfirmStatus::NothingToConfirm);
        assert!(store.submissions().is_empty());
    }

    #[test]
    fn other_quivers_are_left_alone() {
        let buffer = SessionScoreBuffer::default();
        let mut store = store_with_two_arrows();
        buffer.append("1", "1", record(10)).expect("append should work");
        buffer.append("2", "9", record(3)).expect("append should work");

        buffer.confirm("1", &mut store);

        assert_eq!(buffer.container_ids(), vec!["2".to_string()]);
        assert_eq!(buffer.pending_count("2"), 1);
    }

    /// Refuses every score and discards the quiver from the buffer on the first attempt.
    struct DiscardingStore<'a> {
        inner: MemoryStore,
        buffer: &'a SessionScoreBuffer,
        recreate: bool,
    }

    impl ScoreStore for DiscardingStore<'_> {
        fn list_containers(&self) -> Result<Vec<Container>> {
            self.inner.list_containers()
        }

        fn list_items(&self, container_id: &str) -> Result<Vec<Item>> {
            self.inner.list_items(container_id)
        }

        fn submit_score(
            &mut self,
            item_id: &str,
            shot: &SessionShot,
        ) -> Result<StoredScore> {
            if self.inner.submissions().is_empty() {
                self.buffer.discard("1");
                if self.recreate {
                    self.buffer
                        .append("1", "2", record(5))
                        .expect("append should work");
                }
            }
            self.inner.fail_item(item_id);
            self.inner.submit_score(item_id, shot)
        }

        fn remove_item(&mut self, item_id: &str) -> Result<Item> {
            self.inner.remove_item(item_id)
        }
    }

    #[test]
    fn retain_does_not_resurrect_a_quiver_discarded_mid_confirm() {
        let buffer = SessionScoreBuffer::new(FailedSubmissionPolicy::Retain);
        buffer.append("1", "1", record(10)).expect("append should work");
        buffer.append("1", "1", record(9)).expect("append should work");
        let mut store = DiscardingStore {
            inner: store_with_two_arrows(),
            buffer: &buffer,
            recreate: false,
        };

        let report = buffer.confirm("1", &mut store);

        assert_eq!(report.status, ConfirmStatus::AllFailed);
        assert_eq!(report.retained, 0);
        assert!(buffer.container_ids().is_empty());
    }

    #[test]
    fn retain_leaves_a_recreated_quiver_to_its_new_shots() {
        let buffer = SessionScoreBuffer::new(FailedSubmissionPolicy::Retain);
        buffer.append("1", "1", record(10)).expect("append should work");
        let mut store = DiscardingStore {
            inner: store_with_two_arrows(),
            buffer: &buffer,
            recreate: true,
        };

        let report = buffer.confirm("1", &mut store);

        assert_eq!(report.retained, 0);
        let pending = buffer.pending("1");
        assert_eq!(pending.len(), 1);
        assert_eq!(pending["2"][0].record.score, 5);
    }

    #[test]
    fn confirm_accepts_a_trait_object_store() {
        let buffer = SessionScoreBuffer::default();
        let mut store = store_with_two_arrows();
        buffer.append("1", "2", record(8)).expect("append should work");

        let dyn_store: &mut dyn ScoreStore = &mut store;
        let report = buffer.confirm("1", dyn_store);
        assert_eq!(report.status, ConfirmStatus::Confirmed);
    }
}
