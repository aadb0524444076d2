//! A set of orbital bodies linked by parent relationships.

use std::collections::HashMap;
use std::fmt;

use glam::DVec3;
use planetarium_config::SystemConfig;
use tracing::{debug, info};

use crate::body::OrbitalBody;
use crate::error::OrbitError;

/// Handle to a body inside an [`OrbitalSystem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(usize);

impl BodyId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

struct Node {
    body: OrbitalBody,
    parent: Option<BodyId>,
}

/// Arena of orbital bodies. Children are always updated after their parent
/// so a spline can follow a moving parent in the same tick.
#[derive(Default)]
pub struct OrbitalSystem {
    nodes: Vec<Node>,
    names: HashMap<String, BodyId>,
}

impl OrbitalSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build every configured body and resolve parents by name.
    pub fn from_config(config: &SystemConfig) -> Result<Self, OrbitError> {
        let mut system = Self::new();
        for body in &config.bodies {
            system.add_body(OrbitalBody::from_config(body), None)?;
        }
        for body in &config.bodies {
            let Some(parent_name) = &body.parent else {
                continue;
            };
            let parent = system.find(parent_name).ok_or_else(|| OrbitError::UnknownParent {
                body: body.name.clone(),
                parent: parent_name.clone(),
            })?;
            if let Some(id) = system.find(&body.name) {
                system.set_parent(id, Some(parent))?;
            }
        }
        info!(bodies = system.len(), "Built orbital system");
        Ok(system)
    }

    pub fn add_body(
        &mut self,
        body: OrbitalBody,
        parent: Option<BodyId>,
    ) -> Result<BodyId, OrbitError> {
        if self.names.contains_key(body.name()) {
            return Err(OrbitError::DuplicateName(body.name().to_string()));
        }
        if let Some(p) = parent {
            self.node(p)?;
        }
        let id = BodyId(self.nodes.len());
        self.names.insert(body.name().to_string(), id);
        self.nodes.push(Node { body, parent });
        Ok(id)
    }

    /// Re-parent a body. Loops through other bodies are only detected on [`tick`](Self::tick).
    pub fn set_parent(&mut self, id: BodyId, parent: Option<BodyId>) -> Result<(), OrbitError> {
        let name = self.node(id)?.body.name().to_string();
        if let Some(p) = parent {
            self.node(p)?;
            if p == id {
                return Err(OrbitError::SelfParent(name));
            }
        }
        self.node_mut(id)?.parent = parent;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn find(&self, name: &str) -> Option<BodyId> {
        self.names.get(name).copied()
    }

    pub fn get(&self, id: BodyId) -> Option<&OrbitalBody> {
        self.nodes.get(id.0).map(|n| &n.body)
    }

    /// Call [`refresh_spline`](Self::refresh_spline) after editing orbital elements.
    pub fn get_mut(&mut self, id: BodyId) -> Option<&mut OrbitalBody> {
        self.nodes.get_mut(id.0).map(|n| &mut n.body)
    }

    pub fn parent(&self, id: BodyId) -> Option<BodyId> {
        self.nodes.get(id.0).and_then(|n| n.parent)
    }

    pub fn iter(&self) -> impl Iterator<Item = (BodyId, &OrbitalBody)> {
        self.nodes.iter().enumerate().map(|(i, n)| (BodyId(i), &n.body))
    }

    fn node(&self, id: BodyId) -> Result<&Node, OrbitError> {
        self.nodes.get(id.0).ok_or(OrbitError::UnknownBody(id.0))
    }

    fn node_mut(&mut self, id: BodyId) -> Result<&mut Node, OrbitError> {
        self.nodes.get_mut(id.0).ok_or(OrbitError::UnknownBody(id.0))
    }

    fn parent_is_mobile(&self, id: BodyId) -> bool {
        self.parent(id)
            .and_then(|p| self.get(p))
            .is_some_and(OrbitalBody::is_mobile)
    }

    /// Body ids ordered so each parent precedes its children.
    fn update_order(&self) -> Result<Vec<BodyId>, OrbitError> {
        let mut depth = vec![0usize; self.nodes.len()];
        for (i, d) in depth.iter_mut().enumerate() {
            let mut current = self.nodes[i].parent;
            while let Some(p) = current {
                *d += 1;
                if *d > self.nodes.len() {
                    return Err(OrbitError::Cycle(self.nodes[i].body.name().to_string()));
                }
                current = self.nodes.get(p.0).and_then(|n| n.parent);
            }
        }
        let mut order: Vec<BodyId> = (0..self.nodes.len()).map(BodyId).collect();
        order.sort_by_key(|id| depth[id.0]);
        Ok(order)
    }

    /// Restart every mobile body from its time offset, build the orbit splines
    /// of those with a parent and place them on it.
    pub fn begin_play(&mut self) -> Result<(), OrbitError> {
        for id in self.update_order()? {
            if !self.nodes[id.0].body.is_mobile() {
                continue;
            }
            self.nodes[id.0].body.reset_time();
            self.refresh_spline(id)?;
        }
        Ok(())
    }

    /// Rebuild a body's spline around its parent's current position.
    /// Bodies without a parent have no orbit and are left alone.
    pub fn refresh_spline(&mut self, id: BodyId) -> Result<(), OrbitError> {
        let Some(parent) = self.node(id)?.parent else {
            return Ok(());
        };
        let center = self.node(parent)?.body.position();
        let body = &mut self.node_mut(id)?.body;
        body.rebuild_spline(center);
        body.update_position();
        debug!(
            body = body.name(),
            length = body.spline().map(|s| s.length()).unwrap_or_default(),
            "Rebuilt orbit spline"
        );
        Ok(())
    }

    /// Advance all mobile bodies by `dt` seconds, parents first.
    pub fn tick(&mut self, dt: f64) -> Result<(), OrbitError> {
        for id in self.update_order()? {
            if self.parent_is_mobile(id) {
                let center = self
                    .parent(id)
                    .and_then(|p| self.get(p))
                    .map(OrbitalBody::position)
                    .unwrap_or(DVec3::ZERO);
                if let Some(spline) = self.nodes[id.0].body.spline_mut() {
                    spline.set_center(center);
                }
            }
            self.nodes[id.0].body.tick(dt);
        }
        Ok(())
    }
}
