//! Course entity <-> model mapper

use tracker_core::entities::Course;
use tracker_core::value_objects::CourseId;

use crate::models::CourseModel;

/// Convert CourseModel to Course entity
impl From<CourseModel> for Course {
    fn from(model: CourseModel) -> Self {
        Course {
            id: CourseId::new(model.id),
            name: model.name,
            code: model.code,
            group: model.course_group,
            description: model.description,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
