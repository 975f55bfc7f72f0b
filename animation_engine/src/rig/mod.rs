pub mod resolver;

use nalgebra_glm as glm;
use resources::scene::NodeId;

/// Logical bones the driver animates, resolved once per model by matching
/// raw node names against the alias table below.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoneRole {
    Head,
    Neck,
    Spine,
    LeftArm,
    RightArm,
    LeftForeArm,
    RightForeArm,
}

impl BoneRole {
    pub const ALL: [BoneRole; 7] = [
        BoneRole::Head,
        BoneRole::Neck,
        BoneRole::Spine,
        BoneRole::LeftArm,
        BoneRole::RightArm,
        BoneRole::LeftForeArm,
        BoneRole::RightForeArm,
    ];

    /// Acceptable raw names, exact match, first hit wins.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            BoneRole::Head => &["Head", "mixamorigHead", "mixamorig:Head"],
            BoneRole::Neck => &["Neck", "mixamorigNeck", "mixamorig:Neck"],
            BoneRole::Spine => &["Spine", "mixamorigSpine", "mixamorig:Spine"],
            BoneRole::LeftArm => &["LeftArm", "mixamorigLeftArm", "mixamorig:LeftArm"],
            BoneRole::RightArm => &["RightArm", "mixamorigRightArm", "mixamorig:RightArm"],
            BoneRole::LeftForeArm => &[
                "LeftForeArm",
                "mixamorigLeftForeArm",
                "mixamorig:LeftForeArm",
            ],
            BoneRole::RightForeArm => &[
                "RightForeArm",
                "mixamorigRightForeArm",
                "mixamorig:RightForeArm",
            ],
        }
    }
}

/// Morph channels of one face mesh; either index may be missing on a given
/// asset and the matching effect is skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouthChannel {
    pub node: NodeId,
    pub open: Option<usize>,
    pub smile: Option<usize>,
}

/// How a blink lands on the model: a morph pair on a face mesh, or squashing
/// the eye meshes when the asset carries no blink channels at all.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BlinkTarget {
    Morph {
        node: NodeId,
        left: usize,
        right: usize,
    },
    EyeScale {
        left: NodeId,
        right: NodeId,
        left_rest_y: f32,
        right_rest_y: f32,
    },
}

/// Outcome of rig resolution: non-owning references into the scene graph
/// plus the rest state the per-frame writes are relative to. Immutable for
/// the lifetime of a mounted model.
#[derive(Debug, Clone, Default)]
pub struct RigHandles {
    pub head: Option<NodeId>,
    pub neck: Option<NodeId>,
    pub spine: Option<NodeId>,
    pub left_arm: Option<NodeId>,
    pub right_arm: Option<NodeId>,
    pub left_fore_arm: Option<NodeId>,
    pub right_fore_arm: Option<NodeId>,

    pub mouth: Vec<MouthChannel>,
    pub blink: Option<BlinkTarget>,

    pub root: Option<NodeId>,
    pub root_rest_y: f32,
    pub spine_rest: Option<glm::Quat>,
    pub neck_rest: Option<glm::Quat>,
}

impl RigHandles {
    pub fn bone(&self, role: BoneRole) -> Option<NodeId> {
        match role {
            BoneRole::Head => self.head,
            BoneRole::Neck => self.neck,
            BoneRole::Spine => self.spine,
            BoneRole::LeftArm => self.left_arm,
            BoneRole::RightArm => self.right_arm,
            BoneRole::LeftForeArm => self.left_fore_arm,
            BoneRole::RightForeArm => self.right_fore_arm,
        }
    }

    pub(crate) fn set_bone(&mut self, role: BoneRole, id: NodeId) {
        let slot = match role {
            BoneRole::Head => &mut self.head,
            BoneRole::Neck => &mut self.neck,
            BoneRole::Spine => &mut self.spine,
            BoneRole::LeftArm => &mut self.left_arm,
            BoneRole::RightArm => &mut self.right_arm,
            BoneRole::LeftForeArm => &mut self.left_fore_arm,
            BoneRole::RightForeArm => &mut self.right_fore_arm,
        };
        if slot.is_none() {
            *slot = Some(id);
        }
    }
}
