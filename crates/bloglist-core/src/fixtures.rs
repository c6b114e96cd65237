//! Reference blog list used by tests across the workspace.
//!
//! Compiled only under `cfg(test)` or the `test-support` feature.

use crate::models::BlogRecord;

/// Six blogs by three authors, 36 likes in total.
pub fn reference_blogs() -> Vec<BlogRecord> {
    vec![
        BlogRecord::new(
            "React patterns",
            "Michael Chan",
            "https://reactpatterns.com/",
            7,
        ),
        BlogRecord::new(
            "Go To Statement Considered Harmful",
            "Edsger W. Dijkstra",
            "http://www.u.arizona.edu/~rubinson/copyright_violations/Go_To_Considered_Harmful.html",
            5,
        ),
        BlogRecord::new(
            "Canonical string reduction",
            "Edsger W. Dijkstra",
            "http://www.cs.utexas.edu/~EWD/transcriptions/EWD08xx/EWD808.html",
            12,
        ),
        BlogRecord::new(
            "First class tests",
            "Robert C. Martin",
            "http://blog.cleancoder.com/uncle-bob/2017/05/05/TestDefinitions.htmll",
            10,
        ),
        BlogRecord::new(
            "TDD harms architecture",
            "Robert C. Martin",
            "http://blog.cleancoder.com/uncle-bob/2017/03/03/TDD-Harms-Architecture.html",
            0,
        ),
        BlogRecord::new(
            "Type wars",
            "Robert C. Martin",
            "http://blog.cleancoder.com/uncle-bob/2016/05/01/TypeWars.html",
            2,
        ),
    ]
}

/// The reference list as raw JSON, including the storage fields a document
/// database would attach.
pub fn reference_blogs_json() -> serde_json::Value {
    let ids = [
        "5a422a851b54a676234d17f7",
        "5a422aa71b54a676234d17f8",
        "5a422b3a1b54a676234d17f9",
        "5a422b891b54a676234d17fa",
        "5a422ba71b54a676234d17fb",
        "5a422bc61b54a676234d17fc",
    ];
    let docs: Vec<serde_json::Value> = reference_blogs()
        .into_iter()
        .zip(ids)
        .map(|(blog, id)| {
            serde_json::json!({
                "_id": id,
                "title": blog.title,
                "author": blog.author,
                "url": blog.url,
                "likes": blog.likes,
                "__v": 0
            })
        })
        .collect();
    serde_json::Value::Array(docs)
}
