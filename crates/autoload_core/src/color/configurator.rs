//! Per-source color pipeline setup.

use std::path::Path;

use super::errors::ColorResult;
use super::types::{ColorOutcome, FileKind, MovieColorspace, ResolvedColorSettings, StageOutcome};
use crate::host::{
    HostResult, NodeGraph, NodeId, COLOR_TYPE, LINEARIZE_PIPELINE_TYPE, LINEARIZE_TYPE,
    LOOK_LUT_TYPE, LOOK_PIPELINE_TYPE, OCIO_FILE_TYPE, REC709_TO_LINEAR_TYPE,
};
use crate::resolver::FileResolver;

/// Look stage being configured.
#[derive(Debug, Clone, Copy)]
enum LookStage {
    Cdl,
    Lut,
}

impl LookStage {
    fn label(&self) -> &'static str {
        match self {
            LookStage::Cdl => "look CDL",
            LookStage::Lut => "look LUT",
        }
    }

    fn node_type(&self) -> &'static str {
        match self {
            LookStage::Cdl => COLOR_TYPE,
            LookStage::Lut => LOOK_LUT_TYPE,
        }
    }
}

/// Applies the session color settings to newly loaded source groups.
#[derive(Debug, Clone)]
pub struct ColorConfigurator {
    settings: ResolvedColorSettings,
    resolver: FileResolver,
}

impl ColorConfigurator {
    pub fn new(settings: ResolvedColorSettings, resolver: FileResolver) -> Self {
        Self { settings, resolver }
    }

    pub fn settings(&self) -> &ResolvedColorSettings {
        &self.settings
    }

    /// Configure the color pipeline of `group`, whose primary media is
    /// `source_path`.
    ///
    /// Movies get linearize flags, stills get an OCIO input transform plus
    /// the optional look stages. Other file types are left alone. A look
    /// file that can't be found or loaded leaves only its own stage
    /// unconfigured.
    pub fn configure<G>(
        &self,
        graph: &mut G,
        group: &str,
        source_path: &Path,
    ) -> ColorResult<ColorOutcome>
    where
        G: NodeGraph + ?Sized,
    {
        let kind = FileKind::from_path(source_path);
        match kind {
            FileKind::Movie => {
                self.configure_movie(graph, group)?;
                Ok(ColorOutcome::untouched(kind))
            }
            FileKind::Still => self.configure_still(graph, group, source_path),
            FileKind::Other => {
                tracing::debug!(
                    "No color setup for {}: unsupported file type",
                    source_path.display()
                );
                Ok(ColorOutcome::untouched(kind))
            }
        }
    }

    fn configure_movie<G>(&self, graph: &mut G, group: &str) -> ColorResult<()>
    where
        G: NodeGraph + ?Sized,
    {
        // Validate the tag before touching the graph.
        let colorspace: MovieColorspace = self.settings.movie_colorspace.parse()?;
        let flags = colorspace.linearize_flags();

        let pipe = graph.first_node_of_type(group, LINEARIZE_PIPELINE_TYPE)?;
        let linearize = graph.first_node_of_type(&pipe, LINEARIZE_TYPE)?;

        tracing::debug!("Linearizing {} as {}", linearize, colorspace);
        graph.set_int(&format!("{}.color.sRGB2linear", linearize), flags.srgb)?;
        graph.set_int(&format!("{}.color.logtype", linearize), flags.log)?;
        graph.set_int(&format!("{}.color.Rec709ToLinear", linearize), flags.rec709)?;
        Ok(())
    }

    fn configure_still<G>(
        &self,
        graph: &mut G,
        group: &str,
        source_path: &Path,
    ) -> ColorResult<ColorOutcome>
    where
        G: NodeGraph + ?Sized,
    {
        let pipe = graph.first_node_of_type(group, LINEARIZE_PIPELINE_TYPE)?;
        graph.set_string_property(
            &format!("{}.pipeline.nodes", pipe),
            &[OCIO_FILE_TYPE.to_string()],
            true,
        )?;

        let ocio = graph.first_node_of_type(&pipe, OCIO_FILE_TYPE)?;
        tracing::debug!(
            "OCIO transform {} from '{}' to '{}'",
            ocio,
            self.settings.input_colorspace,
            self.settings.working_space
        );
        graph.set_string(&format!("{}.ocio.function", ocio), "color")?;
        graph.set_string(&format!("{}.ocio.inColorSpace", ocio), &self.settings.input_colorspace)?;
        graph.set_string(
            &format!("{}.ocio_color.outColorSpace", ocio),
            &self.settings.working_space,
        )?;
        graph.set_int(&format!("{}.ocio.active", ocio), 1)?;

        let look_pipe = graph.first_node_of_type(group, LOOK_PIPELINE_TYPE)?;
        let mut look_nodes = Vec::new();
        if self.settings.look_cdl.is_some() {
            look_nodes.push(COLOR_TYPE.to_string());
        }
        if self.settings.look_lut.is_some() {
            look_nodes.push(LOOK_LUT_TYPE.to_string());
            look_nodes.push(REC709_TO_LINEAR_TYPE.to_string());
        }
        graph.set_string_property(&format!("{}.pipeline.nodes", look_pipe), &look_nodes, true)?;

        let look_cdl = self.load_look(graph, LookStage::Cdl, &look_pipe, source_path)?;
        let look_lut = self.load_look(graph, LookStage::Lut, &look_pipe, source_path)?;

        if tracing::enabled!(tracing::Level::DEBUG) {
            let members = graph.nodes_in_group(&look_pipe)?;
            let summary: Vec<String> = members
                .iter()
                .map(|node| {
                    let node_type = graph.node_type(node).unwrap_or_default();
                    format!("{} ({})", node, node_type)
                })
                .collect();
            tracing::debug!("Look pipeline {}: [{}]", look_pipe, summary.join(", "));
        }

        Ok(ColorOutcome {
            kind: FileKind::Still,
            look_cdl,
            look_lut,
        })
    }

    fn load_look<G>(
        &self,
        graph: &mut G,
        stage: LookStage,
        look_pipe: &str,
        source_path: &Path,
    ) -> ColorResult<StageOutcome>
    where
        G: NodeGraph + ?Sized,
    {
        let pattern = match stage {
            LookStage::Cdl => self.settings.look_cdl.as_deref(),
            LookStage::Lut => self.settings.look_lut.as_deref(),
        };
        let Some(pattern) = pattern else {
            return Ok(StageOutcome::NotConfigured);
        };

        let Some(path) = self.resolver.resolve(source_path, pattern)? else {
            tracing::warn!("Can't load {}: no match for '{}'", stage.label(), pattern);
            return Ok(StageOutcome::NotFound);
        };

        let loaded: HostResult<NodeId> = graph
            .first_node_of_type(look_pipe, stage.node_type())
            .and_then(|node| {
                match stage {
                    LookStage::Cdl => graph.read_cdl(&path, &node, true)?,
                    LookStage::Lut => graph.read_lut(&path, &node, true)?,
                }
                Ok(node)
            });

        match loaded {
            Ok(node) => {
                tracing::info!("Loaded {} {} into {}", stage.label(), path.display(), node);
                Ok(StageOutcome::Loaded(path))
            }
            Err(e) => {
                tracing::warn!("Can't load {} {}: {}", stage.label(), path.display(), e);
                Ok(StageOutcome::Failed(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorError;
    use crate::host::{HostCall, InMemoryHost, PropertyValue};
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    const GROUP: &str = "sourceGroup000000";

    fn settings(movie: &str) -> ResolvedColorSettings {
        ResolvedColorSettings {
            movie_colorspace: movie.to_string(),
            input_colorspace: "ACES2065-1".to_string(),
            working_space: "ACEScc".to_string(),
            look_cdl: None,
            look_lut: None,
        }
    }

    fn configurator(settings: ResolvedColorSettings) -> ColorConfigurator {
        ColorConfigurator::new(settings, FileResolver::new(r"_(?P<version>v\d+)").unwrap())
    }

    fn linearize_flags(host: &InMemoryHost) -> (i32, i32, i32) {
        let pipe = format!("{}_tolinPipeline", GROUP);
        let node = host.first_node_of_type(&pipe, LINEARIZE_TYPE).unwrap();
        let get = |name: &str| host.int_property(&format!("{}.color.{}", node, name)).unwrap()[0];
        (get("sRGB2linear"), get("logtype"), get("Rec709ToLinear"))
    }

    #[test]
    fn movie_srgb_sets_only_srgb_flag() {
        let mut host = InMemoryHost::new();
        let path = Path::new("/shots/shot_v001.mov");
        host.add_source_group(GROUP, path);

        let outcome = configurator(settings("sRGB"))
            .configure(&mut host, GROUP, path)
            .unwrap();

        assert_eq!(outcome.kind, FileKind::Movie);
        assert_eq!(linearize_flags(&host), (1, 0, 0));
    }

    #[test]
    fn movie_rec709_and_linear_flags() {
        let path = Path::new("/shots/shot_v001.MP4");

        let mut host = InMemoryHost::new();
        host.add_source_group(GROUP, path);
        configurator(settings("Rec709"))
            .configure(&mut host, GROUP, path)
            .unwrap();
        assert_eq!(linearize_flags(&host), (0, 0, 1));

        let mut host = InMemoryHost::new();
        host.add_source_group(GROUP, path);
        configurator(settings("Linear"))
            .configure(&mut host, GROUP, path)
            .unwrap();
        assert_eq!(linearize_flags(&host), (0, 0, 0));
    }

    #[test]
    fn unknown_movie_tag_fails_without_touching_graph() {
        let mut host = InMemoryHost::new();
        let path = Path::new("/shots/shot_v001.mov");
        host.add_source_group(GROUP, path);

        let result = configurator(settings("BadTag")).configure(&mut host, GROUP, path);

        assert!(matches!(result, Err(ColorError::UnknownMovieColorspace(_))));
        assert!(host.calls().is_empty());
    }

    #[test]
    fn still_gets_ocio_transform() {
        let mut host = InMemoryHost::new();
        let path = Path::new("/shots/shot_v001.1001.exr");
        host.add_source_group(GROUP, path);

        let outcome = configurator(settings("Rec709"))
            .configure(&mut host, GROUP, path)
            .unwrap();

        assert_eq!(outcome.kind, FileKind::Still);
        assert_eq!(outcome.look_cdl, StageOutcome::NotConfigured);
        assert_eq!(outcome.look_lut, StageOutcome::NotConfigured);

        let pipe = format!("{}_tolinPipeline", GROUP);
        let ocio = host.first_node_of_type(&pipe, OCIO_FILE_TYPE).unwrap();
        assert!(host.nodes_in_group_of_type(&pipe, LINEARIZE_TYPE).unwrap().is_empty());
        assert_eq!(
            host.property(&format!("{}.ocio.inColorSpace", ocio)),
            Some(&PropertyValue::Strings(vec!["ACES2065-1".to_string()]))
        );
        assert_eq!(
            host.property(&format!("{}.ocio_color.outColorSpace", ocio)),
            Some(&PropertyValue::Strings(vec!["ACEScc".to_string()]))
        );
        assert_eq!(host.int_property(&format!("{}.ocio.active", ocio)), Some(&[1][..]));

        let look_pipe = format!("{}_lookPipeline", GROUP);
        assert!(host.nodes_in_group(&look_pipe).unwrap().is_empty());
    }

    #[test]
    fn missing_cdl_does_not_block_lut() {
        let dir = tempdir().unwrap();
        let primary = dir.path().join("shot_v001.1001.exr");
        fs::write(&primary, b"").unwrap();
        let lut = dir.path().join("shot_v001.cube");
        fs::write(&lut, b"").unwrap();

        let mut host = InMemoryHost::new();
        host.add_source_group(GROUP, &primary);

        let mut color = settings("Rec709");
        color.look_cdl = Some("*_${version}.cdl".to_string());
        color.look_lut = Some("*_${version}.cube".to_string());
        let outcome = configurator(color)
            .configure(&mut host, GROUP, &primary)
            .unwrap();

        let lut = fs::canonicalize(&lut).unwrap();
        assert_eq!(outcome.look_cdl, StageOutcome::NotFound);
        assert_eq!(outcome.look_lut, StageOutcome::Loaded(lut.clone()));

        let look_pipe = format!("{}_lookPipeline", GROUP);
        let types: Vec<String> = host
            .nodes_in_group(&look_pipe)
            .unwrap()
            .iter()
            .map(|n| host.node_type(n).unwrap())
            .collect();
        assert_eq!(types, vec![COLOR_TYPE, LOOK_LUT_TYPE, REC709_TO_LINEAR_TYPE]);

        let lut_node = host.first_node_of_type(&look_pipe, LOOK_LUT_TYPE).unwrap();
        assert!(host.calls().contains(&HostCall::ReadLut {
            path: lut,
            node: lut_node,
        }));
        assert!(!host
            .calls()
            .iter()
            .any(|c| matches!(c, HostCall::ReadCdl { .. })));
    }

    #[test]
    fn cdl_loads_into_color_node() {
        let dir = tempdir().unwrap();
        let primary = dir.path().join("shot_v002.dpx");
        fs::write(&primary, b"").unwrap();
        fs::write(dir.path().join("grade.cdl"), b"").unwrap();

        let mut host = InMemoryHost::new();
        host.add_source_group(GROUP, &primary);

        let mut color = settings("Rec709");
        color.look_cdl = Some("grade.cdl".to_string());
        let outcome = configurator(color)
            .configure(&mut host, GROUP, &primary)
            .unwrap();

        assert!(matches!(
            outcome.look_cdl,
            StageOutcome::Loaded(ref p) if p.ends_with("grade.cdl")
        ));
        assert_eq!(outcome.look_lut, StageOutcome::NotConfigured);
    }

    #[test]
    fn other_file_types_are_untouched() {
        let mut host = InMemoryHost::new();
        let path = PathBuf::from("/shots/reference.jpg");
        host.add_source_group(GROUP, &path);

        let outcome = configurator(settings("BadTag"))
            .configure(&mut host, GROUP, &path)
            .unwrap();

        assert_eq!(outcome.kind, FileKind::Other);
        assert!(host.calls().is_empty());
    }
}
