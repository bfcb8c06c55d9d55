use outbreak_shared::{Aabb, EntityId, Vec2};

/// One resolved overlap between two collidable entities. The normal points
/// from `b` toward `a` along the axis of least penetration and is always a
/// unit axis vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub a: EntityId,
    pub b: EntityId,
    pub normal: Vec2,
    pub depth: f32,
}

/// Computes the contact between two boxes, if they overlap. Separation is
/// along the minimum-penetration axis; ties resolve to the X axis.
pub fn contact(a: EntityId, a_box: &Aabb, b: EntityId, b_box: &Aabb) -> Option<Contact> {
    let pen = a_box.penetration(b_box);
    if pen.x <= 0.0 || pen.y <= 0.0 {
        return None;
    }

    let (normal, depth) = if pen.x <= pen.y {
        let sign = if a_box.center.x >= b_box.center.x {
            1.0
        } else {
            -1.0
        };
        (Vec2::new(sign, 0.0), pen.x)
    } else {
        let sign = if a_box.center.y >= b_box.center.y {
            1.0
        } else {
            -1.0
        };
        (Vec2::new(0.0, sign), pen.y)
    };

    Some(Contact {
        a,
        b,
        normal,
        depth,
    })
}
