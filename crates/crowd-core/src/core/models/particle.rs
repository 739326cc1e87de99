use super::snapshot::PoseSnapshot;
use nalgebra::{Matrix3, Point3, Vector3};

/// Index value marking a particle that belongs to no collection.
///
/// Detached particles are short-lived helpers (depletant probes, frozen pose
/// copies) that are compared against real particles but are never inserted
/// into the particle population or the neighbor index.
pub const DETACHED: usize = usize::MAX;

/// Represents a rod-like colloidal particle in a periodic box.
///
/// The particle is the unit of state the move engine perturbs: a stable
/// identity, an integer species tag, a center-of-mass position, and an
/// orthonormal body frame. The frame's transpose and the lab-frame
/// interaction-site offsets are derived data and are refreshed by every
/// orientation mutation, so the three always describe the same pose.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// Stable identity within the owning particle collection.
    pub index: usize,
    /// Integer species tag; moves and depletant sampling are keyed on it.
    pub species: i32,
    /// Center-of-mass position.
    pub position: Point3<f64>,
    /// Potential energy contributed by external fields at the current pose.
    pub external_potential: f64,
    /// Orthonormal body frame: columns are the body axes in the lab frame.
    orientation: Matrix3<f64>,
    /// Transpose of the frame, kept consistent with `orientation`.
    orientation_t: Matrix3<f64>,
    /// Interaction-site offsets in the body frame.
    site_offsets: Vec<Vector3<f64>>,
    /// Interaction-site offsets in the lab frame, derived from the frame.
    sites: Vec<Vector3<f64>>,
}

impl Particle {
    /// Creates a particle with the identity orientation and no sites.
    pub fn new(index: usize, species: i32, position: Point3<f64>) -> Self {
        Self {
            index,
            species,
            position,
            external_potential: 0.0,
            orientation: Matrix3::identity(),
            orientation_t: Matrix3::identity(),
            site_offsets: Vec::new(),
            sites: Vec::new(),
        }
    }

    /// Creates a detached particle (see [`DETACHED`]) at the origin.
    pub fn detached(species: i32) -> Self {
        Self::new(DETACHED, species, Point3::origin())
    }

    /// The particle's body frame as a lab-frame rotation matrix.
    pub fn orientation(&self) -> &Matrix3<f64> {
        &self.orientation
    }

    /// The transpose of the body frame (maps lab vectors into the body frame).
    pub fn orientation_t(&self) -> &Matrix3<f64> {
        &self.orientation_t
    }

    /// First body axis in the lab frame.
    pub fn axis1(&self) -> Vector3<f64> {
        self.orientation.column(0).into_owned()
    }

    /// Second body axis in the lab frame.
    pub fn axis2(&self) -> Vector3<f64> {
        self.orientation.column(1).into_owned()
    }

    /// Third body axis in the lab frame; for a rod this is the long axis.
    pub fn axis3(&self) -> Vector3<f64> {
        self.orientation.column(2).into_owned()
    }

    /// Replaces the body frame and refreshes all frame-derived data.
    ///
    /// The caller is responsible for passing an orthonormal matrix; the
    /// transpose and the lab-frame site offsets are recomputed here so they
    /// can never drift out of sync with the frame itself.
    pub fn set_orientation(&mut self, orientation: Matrix3<f64>) {
        self.orientation = orientation;
        self.orientation_t = orientation.transpose();
        self.refresh_sites();
    }

    /// Composes a rotation onto the current body frame.
    pub fn rotate(&mut self, rotation: &nalgebra::Rotation3<f64>) {
        let rotated = rotation.matrix() * self.orientation;
        self.set_orientation(rotated);
    }

    /// Defines the body-frame interaction-site offsets and derives their
    /// lab-frame counterparts.
    pub fn set_site_offsets(&mut self, offsets: Vec<Vector3<f64>>) {
        self.site_offsets = offsets;
        self.refresh_sites();
    }

    /// Lab-frame interaction-site offsets from the current position.
    pub fn sites(&self) -> &[Vector3<f64>] {
        &self.sites
    }

    /// Captures the current pose for a later bit-exact restore.
    pub fn snapshot(&self) -> PoseSnapshot {
        PoseSnapshot {
            position: self.position,
            orientation: self.orientation,
            orientation_t: self.orientation_t,
        }
    }

    /// Restores a previously captured pose, bit for bit, and refreshes the
    /// frame-derived site offsets.
    pub fn restore(&mut self, snapshot: &PoseSnapshot) {
        self.position = snapshot.position;
        self.orientation = snapshot.orientation;
        self.orientation_t = snapshot.orientation_t;
        self.refresh_sites();
    }

    fn refresh_sites(&mut self) {
        self.sites = self
            .site_offsets
            .iter()
            .map(|offset| self.orientation * offset)
            .collect();
    }
}
