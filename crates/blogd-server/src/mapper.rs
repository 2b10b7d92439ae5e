//! Conversion between wire records and stored documents.

use blogd_protocol::Blog;
use blogd_store::BlogDocument;
use blogd_types::DocumentId;

/// Build a store document from a wire record.
///
/// Fields are copied verbatim. The record's own `id` is never read: the
/// document gets `existing_id` on the update path and no id on the create
/// path, where the store assigns one.
pub fn to_document(blog: &Blog, existing_id: Option<DocumentId>) -> BlogDocument {
    BlogDocument {
        id: existing_id,
        author_id: blog.author_id,
        title: blog.title.clone(),
        content: blog.content.clone(),
    }
}

/// Build a wire record from a store document.
pub fn to_record(doc: &BlogDocument) -> Blog {
    Blog {
        id: doc.id.map(|id| id.to_hex()).unwrap_or_default(),
        author_id: doc.author_id,
        title: doc.title.clone(),
        content: doc.content.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_path_leaves_id_unset() {
        let blog = Blog::new(4, "Second", "Third").with_id("client-supplied");
        let doc = to_document(&blog, None);
        assert!(doc.id.is_none());
        assert_eq!(doc.author_id, 4);
        assert_eq!(doc.title, "Second");
        assert_eq!(doc.content, "Third");
    }

    #[test]
    fn update_path_attaches_existing_id() {
        let id = DocumentId::generate();
        let doc = to_document(&Blog::new(1, "t", "c"), Some(id));
        assert_eq!(doc.id, Some(id));
    }

    #[test]
    fn fields_copied_verbatim() {
        let blog = Blog::new(-3, "  padded  ", "");
        let doc = to_document(&blog, None);
        assert_eq!(doc.title, "  padded  ");
        assert_eq!(doc.content, "");
        assert_eq!(doc.author_id, -3);
    }

    #[test]
    fn record_encodes_id() {
        let id = DocumentId::generate();
        let doc = to_document(&Blog::new(9, "a", "b"), Some(id));
        let blog = to_record(&doc);
        assert_eq!(blog.id, id.to_hex());
        assert_eq!(DocumentId::from_hex(&blog.id).unwrap(), id);
        assert_eq!((blog.author_id, blog.title.as_str(), blog.content.as_str()), (9, "a", "b"));
    }

    #[test]
    fn unassigned_id_maps_to_empty_string() {
        let blog = to_record(&BlogDocument::new(1, "a", "b"));
        assert!(blog.id.is_empty());
    }
}
