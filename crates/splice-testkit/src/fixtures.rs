//! Common host objects used across test suites.

use crate::node::MockNode;
use crate::scene::MockScene;
use serde_json::json;
use splice_core::{ParmTemplate, ParmValue};
use std::rc::Rc;

/// Camera object with resolution, aspect and aperture parameters.
pub fn camera(scene: &MockScene) -> Rc<MockNode> {
    scene
        .node("Object", "cam")
        .native("name", json!("cam1"))
        .parm("resx", 1920)
        .parm("resy", 1080)
        .parm("aspect", 1.0)
        .parm("aperture", 41.4214)
        .build()
}

/// Geometry output driver.
pub fn geometry_driver(scene: &MockScene) -> Rc<MockNode> {
    scene
        .node("Driver", "geometry")
        .native("name", json!("geometry1"))
        .parm("sopoutput", "$HIP/untitled.bgeo.sc")
        .parm("trange", 0)
        .build()
}

/// Object with a composite translate parameter.
pub fn transform(scene: &MockScene) -> Rc<MockNode> {
    scene
        .node("Object", "null")
        .template(ParmTemplate::new(
            "t",
            vec![ParmValue::Float(0.0), ParmValue::Float(0.0), ParmValue::Float(0.0)],
        ))
        .build()
}

/// Object of a type no behavior is registered for (`bar/foo`).
pub fn unknown(scene: &MockScene) -> Rc<MockNode> {
    scene
        .node("Bar", "foo")
        .native("name", json!("foo1"))
        .build()
}
