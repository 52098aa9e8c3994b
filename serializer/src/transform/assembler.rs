//! Assemble parsed sections and steps into the course tree.
//!
//! Pure aggregation: sections keep metadata order, steps keep input order,
//! and nothing is checked across sections. In particular the ids a pretest
//! reserves are never compared with the steps that actually follow it.

use crate::config::CourseSettings;
use crate::models::{Course, Section, SectionMetaData, Step};

/// Accumulates sections under a course header.
#[derive(Debug, Clone)]
pub struct CourseBuilder {
    course: Course,
}

impl CourseBuilder {
    /// Start an empty course from its settings.
    pub fn new(settings: &CourseSettings) -> Self {
        Self {
            course: Course {
                slug: settings.slug.clone(),
                title: settings.title.clone(),
                description: settings.description.clone(),
                grade: settings.grade,
                language: settings.language.clone(),
                sections: Vec::new(),
            },
        }
    }

    /// Append a section built from its metadata and parsed steps.
    pub fn add_section(&mut self, meta: SectionMetaData, steps: Vec<Step>) -> &mut Self {
        self.course.sections.push(Section::new(meta, steps));
        self
    }

    pub fn build(self) -> Course {
        self.course
    }
}

/// Build a course from `(metadata, steps)` pairs in the given order.
pub fn assemble<I>(settings: &CourseSettings, sections: I) -> Course
where
    I: IntoIterator<Item = (SectionMetaData, Vec<Step>)>,
{
    let mut builder = CourseBuilder::new(settings);
    for (meta, steps) in sections {
        builder.add_section(meta, steps);
    }
    builder.build()
}
