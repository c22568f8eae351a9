use crate::model::{CourseAndRegistration, Term};

/// One term of one year and the courses offered in it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermNode {
    pub year: i32,
    pub term: Term,
    pub courses: Vec<CourseAndRegistration>,
}

impl TermNode {
    /// Label shown for the node, e.g. "Fall 2024"
    pub fn label(&self) -> String {
        format!("{} {}", self.term.name, self.year)
    }
}

/// Courses grouped by term: most recent year first, later terms of a year
/// before earlier ones, courses by name within a term.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermAndCourseTree {
    terms: Vec<TermNode>,
}

impl TermAndCourseTree {
    pub fn new(courses: &[CourseAndRegistration]) -> Self {
        let mut sorted = courses.to_vec();
        sorted.sort_by(|a, b| {
            b.course
                .year
                .cmp(&a.course.year)
                .then_with(|| b.course.term.seq.cmp(&a.course.term.seq))
                .then_with(|| a.course.term.id.cmp(&b.course.term.id))
                .then_with(|| a.course.name.cmp(&b.course.name))
        });

        let mut terms: Vec<TermNode> = Vec::new();
        for entry in sorted {
            match terms.last_mut() {
                Some(node) if node.year == entry.course.year && node.term == entry.course.term => {
                    node.courses.push(entry);
                }
                _ => terms.push(TermNode {
                    year: entry.course.year,
                    term: entry.course.term.clone(),
                    courses: vec![entry],
                }),
            }
        }

        Self { terms }
    }

    pub fn terms(&self) -> &[TermNode] {
        &self.terms
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn find_course(&self, course_id: i32) -> Option<&CourseAndRegistration> {
        self.terms
            .iter()
            .flat_map(|node| node.courses.iter())
            .find(|entry| entry.course.id == course_id)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::model::{Course, CourseRegistration, RegistrationType};
    use uuid::Uuid;

    pub(crate) fn course(
        id: i32,
        name: &str,
        term: (&str, i32),
        year: i32,
        registration_type: RegistrationType,
    ) -> CourseAndRegistration {
        CourseAndRegistration {
            course: Course {
                id,
                name: name.to_string(),
                title: format!("{name} title"),
                url: String::new(),
                term: Term {
                    id: term.1,
                    name: term.0.to_string(),
                    seq: term.1,
                },
                year,
            },
            registration: CourseRegistration {
                id: id * 10,
                course_id: id,
                user_id: Uuid::nil(),
                registration_type,
                section: 101,
            },
        }
    }

    #[test]
    fn test_tree_orders_years_terms_and_courses() {
        use RegistrationType::Student;

        let tree = TermAndCourseTree::new(&[
            course(1, "CS 201", ("Spring", 1), 2024, Student),
            course(2, "CS 101", ("Fall", 3), 2023, Student),
            course(3, "CS 350", ("Fall", 3), 2024, Student),
            course(4, "CS 110", ("Fall", 3), 2024, Student),
        ]);

        let labels: Vec<_> = tree.terms().iter().map(TermNode::label).collect();
        assert_eq!(labels, vec!["Fall 2024", "Spring 2024", "Fall 2023"]);

        let fall_2024: Vec<_> = tree.terms()[0]
            .courses
            .iter()
            .map(|c| c.course.name.as_str())
            .collect();
        assert_eq!(fall_2024, vec!["CS 110", "CS 350"]);
    }

    #[test]
    fn test_find_course() {
        let tree = TermAndCourseTree::new(&[course(
            7,
            "CS 101",
            ("Fall", 3),
            2024,
            RegistrationType::Instructor,
        )]);

        assert_eq!(tree.find_course(7).map(|c| c.course.id), Some(7));
        assert!(tree.find_course(8).is_none());
        assert!(TermAndCourseTree::default().is_empty());
    }
}
