#[cfg(test)]
pub mod fixtures {
    use std::sync::Arc;

    use crate::{
        models::domain::{LessonInfo, MaterialType, SubBabInfo, SubBabProgress, SubjectInfo},
        repositories::{
            content_repository::MockContentDirectory, student_repository::MockStudentDirectory,
            ProgressStore, UpsertWriter,
        },
    };

    /// Content tree used across service tests:
    /// math → lesson-1 (sub-1, sub-2), lesson-2 (sub-3); science → lesson-3 (sub-4).
    pub fn content_directory() -> MockContentDirectory {
        let mut content = MockContentDirectory::new();
        content.expect_find_lesson().returning(|id| {
            let subject_id = match id {
                "lesson-1" | "lesson-2" => "math",
                "lesson-3" => "science",
                _ => return Ok(None),
            };
            Ok(Some(LessonInfo {
                id: id.to_string(),
                title: format!("Lesson {}", id),
                subject_id: subject_id.to_string(),
            }))
        });
        content.expect_find_subject().returning(|id| {
            let name = match id {
                "math" => "Mathematics",
                "science" => "Science",
                _ => return Ok(None),
            };
            Ok(Some(SubjectInfo {
                id: id.to_string(),
                name: name.to_string(),
            }))
        });
        content.expect_find_sub_bab().returning(|id| {
            let lesson_id = match id {
                "sub-1" | "sub-2" => "lesson-1",
                "sub-3" => "lesson-2",
                "sub-4" => "lesson-3",
                _ => return Ok(None),
            };
            Ok(Some(SubBabInfo {
                id: id.to_string(),
                lesson_id: lesson_id.to_string(),
                title: String::new(),
            }))
        });
        content
    }

    pub fn student_directory() -> MockStudentDirectory {
        let mut students = MockStudentDirectory::new();
        students
            .expect_student_name()
            .returning(|_| Ok(Some("Ayu Lestari".to_string())));
        students
    }

    /// Writes a sub-bab record for student-1, fully completed or untouched.
    pub async fn store_sub_bab(
        store: &ProgressStore,
        sub_bab_id: &str,
        lesson_id: &str,
        completed: bool,
    ) -> SubBabProgress {
        let mut progress =
            SubBabProgress::seed("student-1", sub_bab_id, lesson_id, &MaterialType::ALL);
        if completed {
            for material in MaterialType::ALL {
                progress.mark_material(material);
            }
        }
        UpsertWriter::new(Arc::clone(&store.sub_babs))
            .upsert(progress)
            .await
            .expect("sub-bab fixture should be stored")
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use crate::repositories::{
        ContentDirectory, DocumentCollection, ProgressStore, StudentDirectory,
    };

    #[tokio::test]
    async fn content_fixture_resolves_the_tree() {
        let content = content_directory();

        let lesson = content.find_lesson("lesson-3").await.unwrap().unwrap();
        assert_eq!(lesson.subject_id, "science");
        let sub_bab = content.find_sub_bab("sub-2").await.unwrap().unwrap();
        assert_eq!(sub_bab.lesson_id, "lesson-1");
        assert!(content.find_subject("art").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn student_fixture_has_a_name() {
        let name = student_directory().student_name("student-1").await.unwrap();
        assert_eq!(name.as_deref(), Some("Ayu Lestari"));
    }

    #[tokio::test]
    async fn store_sub_bab_fixture_persists_record() {
        let store = ProgressStore::in_memory();
        let stored = store_sub_bab(&store, "sub-1", "lesson-1", true).await;

        assert!(stored.is_completed);
        let found = store.sub_babs.find_by_key(&stored.id).await.unwrap();
        assert_eq!(found, Some(stored));
    }
}
