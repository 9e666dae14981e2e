//! Scene graph traversal.
//!
//! The traversal composes transforms on the way down the tree and returns
//! the nearest hit of each subtree on the way up. The accumulated transform
//! lives on the call stack, so each call sees exactly the node-to-view
//! matrix of the node it is visiting.

use sgrt_core::{Node, Scene};
use sgrt_math::{Mat4, Ray};

use crate::hit::nearer;
use crate::primitive::intersect_leaf;
use crate::HitRecord;

/// Nearest intersection of `ray` with the subtree rooted at `node`.
///
/// `parent` maps the node's parent space into the space `ray` is expressed
/// in (the view matrix when called on the root). Children are visited in
/// order; since only a strictly nearer hit replaces the current best, the
/// result does not depend on that order except between exact ties.
pub fn raycast<'a>(node: &'a Node, ray: &Ray, parent: &Mat4) -> Option<HitRecord<'a>> {
    let modelview = *parent * node.local_transform();

    match node {
        Node::Leaf(leaf) => intersect_leaf(leaf, ray, &modelview),
        Node::Group(group) => group
            .children
            .iter()
            .fold(None, |best, child| nearer(best, raycast(child, ray, &modelview))),
    }
}

/// Cast a view-space ray into a scene.
///
/// Returns a "no hit" record when nothing is struck.
pub fn cast_ray<'a>(scene: &'a Scene, ray: &Ray) -> HitRecord<'a> {
    cast_ray_from(&scene.root, &scene.view_matrix(), ray)
}

/// [`cast_ray`] with the world-to-view matrix already computed.
pub fn cast_ray_from<'a>(root: &'a Node, view: &Mat4, ray: &Ray) -> HitRecord<'a> {
    raycast(root, ray, view).unwrap_or_default()
}
