//! Two-phase auto loader.
//!
//! Representations are resolved when a source group finishes loading but
//! only added once the host signals that progressive loading is done, since
//! adding media mid-load can leave the session in a broken state.

use std::path::{Path, PathBuf};

use super::errors::AutoloadResult;
use super::events::SourceGroupEvent;
use super::queue::{PendingMediaRepresentation, PendingQueue};
use super::types::{DrainReport, FailedRepresentation, GroupOutcome, Phase};
use crate::color::{ColorConfigurator, ResolvedColorSettings};
use crate::config::{AutoloaderConfig, PlateSettings, PlateVariant, PLATE_PREFIX};
use crate::host::{
    AddRepresentation, HostError, HostEvent, HostResult, NodeGraph, NodeId, PropertyType,
    FILE_SOURCE_TYPE,
};
use crate::mode::ModeSettings;
use crate::resolver::FileResolver;

/// Name of the representation created for sources loaded without any.
pub const DEFAULT_REP_NAME: &str = "Source";

/// Resolves variant media for loaded sources and applies it on the drain
/// signal.
#[derive(Debug)]
pub struct Orchestrator {
    config: AutoloaderConfig,
    resolver: FileResolver,
    color: ColorConfigurator,
    queue: PendingQueue,
    delete_groups: Vec<NodeId>,
    phase: Phase,
}

impl Orchestrator {
    /// Create an orchestrator for a validated config.
    pub fn new(config: AutoloaderConfig, color: ResolvedColorSettings) -> AutoloadResult<Self> {
        let resolver = FileResolver::new(&config.main.version_regex)?;
        let color = ColorConfigurator::new(color, resolver.clone());
        Ok(Self {
            config,
            resolver,
            color,
            queue: PendingQueue::new(),
            delete_groups: Vec::new(),
            phase: Phase::Idle,
        })
    }

    pub fn config(&self) -> &AutoloaderConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Representations waiting for the drain signal.
    pub fn pending(&self) -> &PendingQueue {
        &self.queue
    }

    /// Groups that will be deleted on the next drain.
    pub fn groups_pending_deletion(&self) -> &[NodeId] {
        &self.delete_groups
    }

    /// Handle a source-group-complete event.
    ///
    /// The event is rejected first so later listeners still see it.
    /// Configuration errors (malformed patterns, bad movie colorspace) are
    /// returned; a pattern that matches nothing is only logged.
    pub fn on_source_group_complete<G, E>(
        &mut self,
        graph: &mut G,
        event: &mut E,
        settings: &ModeSettings,
    ) -> AutoloadResult<GroupOutcome>
    where
        G: NodeGraph + ?Sized,
        E: HostEvent + ?Sized,
    {
        tracing::debug!("source-group-complete: '{}'", event.contents());
        let parsed = SourceGroupEvent::parse(event.contents());
        event.reject();
        let SourceGroupEvent { group, action } = parsed?;

        self.phase = Phase::Resolving;
        let result = self.resolve_group(graph, &group, &action, settings);
        self.phase = Phase::AwaitingDrainSignal;

        if let Ok(outcome) = &result {
            tracing::debug!(
                "Resolved {}: {} queued, {} not found, {} pending in total",
                group,
                outcome.queued.len(),
                outcome.not_found.len(),
                self.queue.len()
            );
        }
        result
    }

    /// Handle the after-progressive-loading event.
    ///
    /// Applies every pending representation in FIFO order, then deletes the
    /// groups flagged while resolving. Failures of single items are logged
    /// and reported without stopping the drain.
    pub fn after_progressive_loading<G, E>(&mut self, graph: &mut G, event: &mut E) -> DrainReport
    where
        G: NodeGraph + ?Sized,
        E: HostEvent + ?Sized,
    {
        tracing::debug!("after-progressive-loading: {} pending", self.queue.len());
        self.phase = Phase::Draining;

        let mut report = DrainReport::default();
        while let Some(item) = self.queue.pop() {
            self.apply(graph, item, &mut report);
        }

        for group in self.delete_groups.drain(..) {
            tracing::debug!("Deleting {}", group);
            match graph.delete_node(&group) {
                Ok(()) => report.deleted_groups.push(group),
                Err(e) => tracing::warn!("Can't delete {}: {}", group, e),
            }
        }

        self.phase = Phase::Idle;
        event.reject();
        report
    }

    fn resolve_group<G>(
        &mut self,
        graph: &mut G,
        group: &str,
        action: &str,
        settings: &ModeSettings,
    ) -> AutoloadResult<GroupOutcome>
    where
        G: NodeGraph + ?Sized,
    {
        let mut outcome = GroupOutcome::new(group, action);
        let (source, source_path) = file_source(graph, group)?;

        let resolved = if settings.load_plates_enabled {
            self.autoload_plates(graph, group, &source, &source_path, &mut outcome)?
        } else {
            tracing::debug!("Plate auto loader disabled");
            Vec::new()
        };

        if settings.load_luts_enabled {
            outcome.color = Some(self.color.configure(graph, group, &source_path)?);
        } else {
            tracing::debug!("LUT auto loader disabled");
        }

        // Queue only once nothing for this group failed.
        for item in resolved {
            self.queue.push(item);
        }
        Ok(outcome)
    }

    fn autoload_plates<G>(
        &mut self,
        graph: &mut G,
        group: &str,
        source: &str,
        source_path: &Path,
        outcome: &mut GroupOutcome,
    ) -> AutoloadResult<Vec<PendingMediaRepresentation>>
    where
        G: NodeGraph + ?Sized,
    {
        let existing: Vec<String> = graph
            .source_media_reps(source)?
            .into_iter()
            .filter(|name| !name.is_empty())
            .collect();

        if existing.is_empty() {
            self.add_default_rep(graph, group, source, source_path, outcome)?;
            return Ok(Vec::new());
        }

        let mut candidates: Vec<(String, String, Option<String>)> = PlateVariant::ALL
            .iter()
            .map(|v| {
                (
                    v.representation_name().to_string(),
                    v.config_key().to_string(),
                    self.config.plates.pattern(*v).map(str::to_string),
                )
            })
            .collect();
        candidates.extend(
            self.config
                .other
                .iter()
                .map(|(name, pattern)| (name.clone(), name.clone(), Some(pattern.clone()))),
        );

        let mut resolved = Vec::new();
        for (name, key, pattern) in candidates {
            if existing.contains(&name) {
                tracing::debug!("{} already loaded on {}", name, source);
                outcome.already_present.push(name);
                continue;
            }
            let Some(pattern) = pattern else {
                tracing::debug!("{} not configured", key);
                continue;
            };

            match self.resolver.resolve(source_path, &pattern)? {
                Some(path) => {
                    tracing::debug!("Queueing {} {}", name, path.display());
                    resolved.push(PendingMediaRepresentation::new(source, name.as_str(), path));
                    outcome.queued.push(name);
                }
                None => {
                    tracing::warn!("Can't autoload {}: no file matches '{}'", name, pattern);
                    outcome.not_found.push(name);
                }
            }
        }
        Ok(resolved)
    }

    /// Give a source without representations a `Source` representation.
    ///
    /// The host moves the media into a new group; the original group is
    /// flagged and deleted on the next drain.
    fn add_default_rep<G>(
        &mut self,
        graph: &mut G,
        group: &str,
        source: &str,
        source_path: &Path,
        outcome: &mut GroupOutcome,
    ) -> AutoloadResult<()>
    where
        G: NodeGraph + ?Sized,
    {
        tracing::debug!("Adding '{}' media representation to {}", DEFAULT_REP_NAME, source);
        let rep_node = match graph.add_source_media_rep(
            source,
            DEFAULT_REP_NAME,
            &[source_path.to_path_buf()],
            None,
        )? {
            AddRepresentation::Added(node) => node,
            AddRepresentation::AlreadyExists => {
                tracing::warn!("{} already has a '{}' representation", source, DEFAULT_REP_NAME);
                return Ok(());
            }
        };

        graph.set_active_source_media_rep(source, DEFAULT_REP_NAME)?;
        self.delete_groups.push(group.to_string());
        outcome.default_rep_created = true;

        if let Some(switch) = graph.source_media_rep_switch_node(&rep_node)? {
            let switch_group = graph.node_group(&switch)?;
            let label = source_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            graph.set_ui_name(&switch_group, &label)?;
        }
        Ok(())
    }

    fn apply<G>(&self, graph: &mut G, item: PendingMediaRepresentation, report: &mut DrainReport)
    where
        G: NodeGraph + ?Sized,
    {
        tracing::info!("Autoloading {} {}", item.name, item.path.display());

        let added = graph.add_source_media_rep(
            &item.source_node,
            &item.name,
            std::slice::from_ref(&item.path),
            item.tag.as_deref(),
        );
        let rep_node = match added {
            Ok(AddRepresentation::Added(node)) => node,
            Ok(AddRepresentation::AlreadyExists) => {
                tracing::warn!(
                    "Media representation '{}' already exists on {}, skipping",
                    item.name,
                    item.source_node
                );
                report.skipped_existing.push((item.source_node, item.name));
                return;
            }
            Err(e) => {
                tracing::warn!("Can't add {} to {}: {}", item.name, item.source_node, e);
                report.failed.push(failure(item, e));
                return;
            }
        };

        match finish_representation(graph, &item, &rep_node, &self.config.plates) {
            Ok(()) => report.applied.push((item.source_node, item.name)),
            Err(e) => {
                tracing::warn!("Can't finish {} on {}: {}", item.name, item.source_node, e);
                report.failed.push(failure(item, e));
            }
        }
    }
}

/// File source node of `group` and its primary media path.
fn file_source<G>(graph: &G, group: &str) -> HostResult<(NodeId, PathBuf)>
where
    G: NodeGraph + ?Sized,
{
    let source = graph.first_node_of_type(group, FILE_SOURCE_TYPE)?;
    let property = format!("{}.media.movie", source);
    let path = graph
        .string_property(&property)?
        .into_iter()
        .next()
        .filter(|p| !p.is_empty())
        .ok_or(HostError::EmptyProperty(property))?;
    Ok((source, PathBuf::from(path)))
}

/// Label the new representation and apply plate frame settings.
fn finish_representation<G>(
    graph: &mut G,
    item: &PendingMediaRepresentation,
    rep_node: &str,
    plates: &PlateSettings,
) -> HostResult<()>
where
    G: NodeGraph + ?Sized,
{
    let rep_group = graph.node_group(rep_node)?;
    graph.set_ui_name(&rep_group, &item.ui_label())?;

    if !item.name.starts_with(PLATE_PREFIX) {
        return Ok(());
    }

    tracing::debug!(
        "Plate {}: cut in {:?}, first frame in file {:?}",
        rep_node,
        plates.plate_cut_in_frame,
        plates.plate_first_frame_in_file
    );
    if let Some(cut_in) = plates.plate_cut_in_frame {
        graph.set_int_property(&format!("{}.cut.in", rep_node), &[cut_in], false)?;
    }
    if let Some(first_frame) = plates.plate_first_frame_in_file {
        let property = format!("{}.group.rangeStart", rep_node);
        if !graph.property_exists(&property) {
            graph.new_property(&property, PropertyType::Int, 1)?;
        }
        graph.set_int_property(&property, &[first_frame], true)?;
    }
    Ok(())
}

fn failure(item: PendingMediaRepresentation, error: HostError) -> FailedRepresentation {
    FailedRepresentation {
        source_node: item.source_node,
        name: item.name,
        message: error.to_string(),
    }
}
