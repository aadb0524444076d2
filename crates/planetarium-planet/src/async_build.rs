//! Background section builds on a worker pool.
//!
//! Subdividing and displacing a fine section is the expensive part of a
//! planet update. Each of the 20 sections has at most one wanted LOD at a
//! time. Submitting a new LOD for a section supersedes the previous one, and
//! workers drop superseded builds themselves, both before starting and after
//! finishing, so stale geometry never reaches the result channel.

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, AtomicU64, Ordering};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, bounded};
use dashmap::DashSet;
use planetarium_mesh::{NUM_SECTIONS, SectionData};
use tracing::{debug, trace};

use crate::error::PlanetError;
use crate::terrain::PlanetTerrain;

/// Marks a section with no build wanted.
const NOT_WANTED: u8 = u8::MAX;

/// Identifies one built section: which icosahedron face, at which LOD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SectionKey {
    pub lod: u8,
    pub section: usize,
}

/// A finished section build.
#[derive(Debug)]
pub struct BuiltSection {
    pub key: SectionKey,
    pub data: SectionData,
    /// Time spent queued before a worker picked the request up.
    pub wait_time: Duration,
    pub build_time: Duration,
}

struct SectionTask {
    key: SectionKey,
    base: SectionData,
    terrain: Arc<PlanetTerrain>,
    submitted: Instant,
}

/// State shared between the builder handle and its workers.
struct BuildState {
    wanted: [AtomicU8; NUM_SECTIONS],
    /// Submitted and neither drained nor dropped yet.
    pending: DashSet<SectionKey>,
    in_flight: AtomicU64,
    superseded: AtomicU64,
}

impl BuildState {
    fn new() -> Self {
        Self {
            wanted: std::array::from_fn(|_| AtomicU8::new(NOT_WANTED)),
            pending: DashSet::new(),
            in_flight: AtomicU64::new(0),
            superseded: AtomicU64::new(0),
        }
    }

    fn is_wanted(&self, key: SectionKey) -> bool {
        self.wanted
            .get(key.section)
            .is_some_and(|w| w.load(Ordering::Acquire) == key.lod)
    }

    /// Stop wanting `key`, leaving a newer LOD for the same section alone.
    fn unwant(&self, key: SectionKey) {
        if let Some(w) = self.wanted.get(key.section) {
            let _ = w.compare_exchange(key.lod, NOT_WANTED, Ordering::AcqRel, Ordering::Acquire);
        }
    }

    fn drop_superseded(&self, key: SectionKey, stage: &'static str) {
        self.pending.remove(&key);
        self.superseded.fetch_add(1, Ordering::Relaxed);
        trace!(lod = key.lod, section = key.section, stage, "Dropped superseded section build");
    }
}

fn run_worker(state: Arc<BuildState>, tasks: Receiver<SectionTask>, results: Sender<BuiltSection>) {
    for task in tasks.iter() {
        let key = task.key;
        if !state.is_wanted(key) {
            state.drop_superseded(key, "queued");
            state.in_flight.fetch_sub(1, Ordering::Relaxed);
            continue;
        }

        let wait_time = task.submitted.elapsed();
        let start = Instant::now();
        let data = task.terrain.build_section(&task.base, key.lod);
        let build_time = start.elapsed();

        let delivered = if state.is_wanted(key) {
            results
                .send(BuiltSection {
                    key,
                    data,
                    wait_time,
                    build_time,
                })
                .is_ok()
        } else {
            state.drop_superseded(key, "built");
            true
        };
        state.in_flight.fetch_sub(1, Ordering::Relaxed);

        if !delivered {
            debug!(lod = key.lod, section = key.section, "Section builder dropped, worker exiting");
            return;
        }
    }
}

/// Worker pool that builds displaced sections off the calling thread.
pub struct AsyncSectionBuilder {
    tasks: Sender<SectionTask>,
    results: Receiver<BuiltSection>,
    state: Arc<BuildState>,
}

impl AsyncSectionBuilder {
    /// `queue_capacity` bounds queued requests; submissions beyond it are rejected.
    pub fn new(
        thread_count: usize,
        queue_capacity: usize,
        result_capacity: usize,
    ) -> Result<Self, PlanetError> {
        let (tasks, task_receiver) = bounded::<SectionTask>(queue_capacity.max(1));
        let (result_sender, results) = bounded::<BuiltSection>(result_capacity.max(1));
        let state = Arc::new(BuildState::new());

        for worker in 0..thread_count.max(1) {
            let state = Arc::clone(&state);
            let task_receiver = task_receiver.clone();
            let result_sender = result_sender.clone();
            std::thread::Builder::new()
                .name(format!("section-build-{worker}"))
                .spawn(move || run_worker(state, task_receiver, result_sender))
                .map_err(PlanetError::WorkerSpawn)?;
        }

        Ok(Self {
            tasks,
            results,
            state,
        })
    }

    /// Leaves two cores for the main loop, with at least one worker.
    pub fn with_defaults() -> Result<Self, PlanetError> {
        let cpus = num_cpus::get().max(2);
        let threads = (cpus - 2).max(1);
        Self::new(threads, 64, 128)
    }

    /// Queue a build of `base` at `key.lod`, superseding any other LOD wanted
    /// for the same section. Returns the key back if the queue is full or the
    /// section index is out of range.
    pub fn submit(
        &self,
        key: SectionKey,
        base: &SectionData,
        terrain: &Arc<PlanetTerrain>,
    ) -> Result<(), SectionKey> {
        let Some(wanted) = self.state.wanted.get(key.section) else {
            return Err(key);
        };
        let previous = wanted.swap(key.lod, Ordering::AcqRel);
        self.state.pending.insert(key);
        self.state.in_flight.fetch_add(1, Ordering::Relaxed);

        let task = SectionTask {
            key,
            base: base.clone(),
            terrain: Arc::clone(terrain),
            submitted: Instant::now(),
        };
        self.tasks.try_send(task).map_err(|e| {
            let key = e.into_inner().key;
            self.state.in_flight.fetch_sub(1, Ordering::Relaxed);
            self.state.pending.remove(&key);
            // A rejected request leaves the earlier wanted LOD in place.
            let _ = wanted.compare_exchange(key.lod, previous, Ordering::AcqRel, Ordering::Acquire);
            key
        })
    }

    /// Stop wanting `key`. A worker holding it drops the result.
    pub fn cancel(&self, key: &SectionKey) {
        self.state.unwant(*key);
        self.state.pending.remove(key);
    }

    /// Collect every finished build without blocking.
    pub fn drain_results(&self) -> Vec<BuiltSection> {
        let mut drained = Vec::new();
        while let Ok(built) = self.results.try_recv() {
            self.accept(&built);
            drained.push(built);
        }
        drained
    }

    /// Block until at least one build finishes or `timeout` passes, then drain.
    pub fn wait_results(&self, timeout: Duration) -> Vec<BuiltSection> {
        match self.results.recv_timeout(timeout) {
            Ok(first) => {
                self.accept(&first);
                let mut drained = vec![first];
                drained.extend(self.drain_results());
                drained
            }
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => Vec::new(),
        }
    }

    fn accept(&self, built: &BuiltSection) {
        self.state.pending.remove(&built.key);
        self.state.unwant(built.key);
    }

    /// Builds queued or executing.
    pub fn in_flight_count(&self) -> u64 {
        self.state.in_flight.load(Ordering::Relaxed)
    }

    /// Builds dropped by workers because a different LOD was wanted by then.
    pub fn superseded_count(&self) -> u64 {
        self.state.superseded.load(Ordering::Relaxed)
    }

    pub fn is_pending(&self, key: &SectionKey) -> bool {
        self.state.pending.contains(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planetarium_config::PlanetConfig;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn shared_terrain() -> Arc<PlanetTerrain> {
        let config = PlanetConfig {
            radius: 500.0,
            scale: 50.0,
            cube_resolution: 16,
            ..PlanetConfig::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        Arc::new(PlanetTerrain::generate(&config, 11, &[], &mut rng).unwrap())
    }

    fn collect(builder: &AsyncSectionBuilder, expected: usize) -> Vec<BuiltSection> {
        let mut results = Vec::new();
        let deadline = Instant::now() + Duration::from_secs(30);
        while results.len() < expected && Instant::now() < deadline {
            results.extend(builder.wait_results(Duration::from_millis(50)));
        }
        results
    }

    fn wait_idle(builder: &AsyncSectionBuilder) {
        let deadline = Instant::now() + Duration::from_secs(30);
        while builder.in_flight_count() > 0 && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(builder.in_flight_count(), 0);
    }

    /// Give the only worker a slow build so later submissions stay queued.
    fn occupy(builder: &AsyncSectionBuilder, terrain: &Arc<PlanetTerrain>) -> SectionKey {
        let key = SectionKey { lod: 7, section: 19 };
        builder.submit(key, &SectionData::base_sections()[19], terrain).unwrap();
        key
    }

    #[test]
    fn test_builds_match_synchronous_result() {
        let terrain = shared_terrain();
        let builder = AsyncSectionBuilder::new(2, 32, 32).unwrap();
        let bases = SectionData::base_sections();

        let key = SectionKey { lod: 3, section: 4 };
        builder.submit(key, &bases[4], &terrain).unwrap();
        let results = collect(&builder, 1);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].key, key);
        assert_eq!(results[0].data, terrain.build_section(&bases[4], 3));
        assert!(!builder.is_pending(&key));
    }

    #[test]
    fn test_concurrent_builds_all_arrive() {
        let terrain = shared_terrain();
        let builder = AsyncSectionBuilder::new(4, 64, 64).unwrap();
        let bases = SectionData::base_sections();

        let mut submitted = 0;
        for (section, base) in bases.iter().enumerate() {
            let key = SectionKey { lod: 2, section };
            if builder.submit(key, base, &terrain).is_ok() {
                submitted += 1;
            }
        }

        let results = collect(&builder, submitted);
        assert_eq!(results.len(), submitted, "got {}/{submitted}", results.len());
        let mut sections: Vec<_> = results.iter().map(|r| r.key.section).collect();
        sections.sort_unstable();
        sections.dedup();
        assert_eq!(sections.len(), submitted);
    }

    #[test]
    fn test_newer_lod_supersedes_older() {
        let terrain = shared_terrain();
        let builder = AsyncSectionBuilder::new(1, 16, 16).unwrap();
        let base = &SectionData::base_sections()[7];

        let busy = occupy(&builder, &terrain);
        let coarse = SectionKey { lod: 6, section: 7 };
        let fine = SectionKey { lod: 1, section: 7 };
        builder.submit(coarse, base, &terrain).unwrap();
        builder.submit(fine, base, &terrain).unwrap();

        let mut results = collect(&builder, 2);
        wait_idle(&builder);
        results.extend(builder.drain_results());

        let mut keys: Vec<_> = results.iter().map(|r| r.key).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec![fine, busy], "only the wanted LOD of section 7 is delivered");
        assert_eq!(builder.superseded_count(), 1);
        assert!(!builder.is_pending(&coarse));
        assert!(!builder.is_pending(&fine));
    }

    #[test]
    fn test_out_of_range_section_rejected() {
        let terrain = shared_terrain();
        let builder = AsyncSectionBuilder::new(1, 4, 4).unwrap();
        let base = &SectionData::base_sections()[0];
        let key = SectionKey {
            lod: 1,
            section: NUM_SECTIONS,
        };
        assert_eq!(builder.submit(key, base, &terrain), Err(key));
        assert_eq!(builder.in_flight_count(), 0);
        assert!(!builder.is_pending(&key));
    }

    #[test]
    fn test_full_queue_rejects() {
        let terrain = shared_terrain();
        let builder = AsyncSectionBuilder::new(1, 1, 1).unwrap();
        let bases = SectionData::base_sections();

        let mut rejected = None;
        for (section, base) in bases.iter().enumerate() {
            let key = SectionKey { lod: 6, section };
            if let Err(k) = builder.submit(key, base, &terrain) {
                rejected = Some(k);
                break;
            }
        }
        let rejected = rejected.expect("a one-slot queue must reject eventually");
        assert!(!builder.is_pending(&rejected));
    }

    #[test]
    fn test_rejected_submit_keeps_earlier_lod() {
        let terrain = shared_terrain();
        let builder = AsyncSectionBuilder::new(1, 1, 4).unwrap();
        let bases = SectionData::base_sections();

        let busy = occupy(&builder, &terrain);
        // Wait for the worker to take the slow build so the queue slot is free.
        let deadline = Instant::now() + Duration::from_secs(30);
        let earlier = SectionKey { lod: 2, section: 3 };
        while builder.submit(earlier, &bases[3], &terrain).is_err() {
            assert!(Instant::now() < deadline, "queue never freed");
            std::thread::sleep(Duration::from_millis(1));
        }
        let later = SectionKey { lod: 4, section: 3 };
        assert_eq!(builder.submit(later, &bases[3], &terrain), Err(later));

        let mut results = collect(&builder, 2);
        wait_idle(&builder);
        results.extend(builder.drain_results());
        let mut keys: Vec<_> = results.iter().map(|r| r.key).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec![earlier, busy]);
        assert_eq!(builder.superseded_count(), 0);
    }

    #[test]
    fn test_cancel_clears_pending() {
        let terrain = shared_terrain();
        let builder = AsyncSectionBuilder::new(1, 16, 16).unwrap();
        let base = &SectionData::base_sections()[0];
        let key = SectionKey { lod: 5, section: 0 };

        let busy = occupy(&builder, &terrain);
        builder.submit(key, base, &terrain).unwrap();
        assert!(builder.is_pending(&key));
        builder.cancel(&key);
        assert!(!builder.is_pending(&key));

        wait_idle(&builder);
        let keys: Vec<_> = builder.drain_results().iter().map(|r| r.key).collect();
        assert_eq!(keys, vec![busy], "cancelled build is not delivered");
        assert_eq!(builder.superseded_count(), 1);
    }
}
