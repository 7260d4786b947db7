use markup5ever_rcdom::Handle;
use tracing::debug;

use crate::dom::{self, NodeKind};
use crate::error::{ConvertError, ConvertResult, NodeRef};

/// The node code emission starts from.
#[derive(Debug, Clone)]
pub struct ContentRoot {
    pub node: Handle,
    pub node_ref: NodeRef,
}

/// Locate the first meaningful content node below `node`.
///
/// An `html` element resolves to the first element child of its `body`.
/// Any other element is content itself, as is a non-blank text node. Every
/// other node kind is searched child by child.
pub fn find_content(node: Option<&Handle>) -> ConvertResult<ContentRoot> {
    let node = node.ok_or_else(|| ConvertError::EmptyNode {
        message: "node is nil".to_string(),
    })?;
    let mut path = Vec::new();
    let root = find_at(node, &mut path)?;
    debug!(node = %root.node_ref, "content root located");
    Ok(root)
}

fn find_at(node: &Handle, path: &mut Vec<usize>) -> ConvertResult<ContentRoot> {
    match dom::kind(node) {
        NodeKind::Element if dom::is_element(node, "html") => find_in_html(node, path),
        NodeKind::Element => Ok(ContentRoot {
            node: node.clone(),
            node_ref: NodeRef::new(path, dom::label(node)),
        }),
        NodeKind::Text if dom::is_content_text(node) => Ok(ContentRoot {
            node: node.clone(),
            node_ref: NodeRef::new(path, dom::label(node)),
        }),
        _ => {
            for (i, child) in dom::children(node).iter().enumerate() {
                path.push(i);
                match find_at(child, path) {
                    Ok(found) => return Ok(found),
                    // the html element decides the outcome for its document
                    Err(e) if dom::is_element(child, "html") => return Err(e),
                    Err(_) => {}
                }
                path.pop();
            }
            Err(ConvertError::NoContent {
                message: format!("no valid content found in node {:?}", dom::label(node)),
                node: NodeRef::new(path, dom::label(node)),
            })
        }
    }
}

fn find_in_html(html: &Handle, path: &[usize]) -> ConvertResult<ContentRoot> {
    let children = dom::children(html);
    let (body_index, body) = children
        .iter()
        .enumerate()
        .find(|(_, child)| dom::is_element(child, "body"))
        .ok_or_else(|| ConvertError::NoBody {
            message: "html tag has no body tag".to_string(),
            node: NodeRef::new(path, dom::label(html)),
        })?;

    let mut body_path = path.to_vec();
    body_path.push(body_index);
    let body_children = dom::children(body);
    let found = body_children
        .iter()
        .enumerate()
        .find(|(_, child)| dom::kind(child) == NodeKind::Element);

    match found {
        Some((i, element)) => {
            body_path.push(i);
            Ok(ContentRoot {
                node: element.clone(),
                node_ref: NodeRef::new(&body_path, dom::label(element)),
            })
        }
        None => Err(ConvertError::EmptyBody {
            message: "body tag has no valid content".to_string(),
            node: NodeRef::new(&body_path, dom::label(body)),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn root_of(html: &str) -> ConvertResult<ContentRoot> {
        let dom = dom::parse(html).unwrap();
        find_content(Some(&dom.document))
    }

    #[test]
    fn descends_into_body() {
        let root = root_of("<div class=\"a\">x</div>").unwrap();
        assert_eq!(dom::tag_name(&root.node).as_deref(), Some("div"));
        assert_eq!(root.node_ref.path, vec![0, 1, 0]);
    }

    #[test]
    fn skips_leading_body_text() {
        let root = root_of("hello <b>world</b>").unwrap();
        assert_eq!(dom::tag_name(&root.node).as_deref(), Some("b"));
    }

    #[test]
    fn doctype_is_skipped() {
        let root = root_of("<!DOCTYPE html><html><body><main></main></body></html>").unwrap();
        assert_eq!(dom::tag_name(&root.node).as_deref(), Some("main"));
        assert_eq!(root.node_ref.path, vec![1, 1, 0]);
    }

    #[test]
    fn empty_body_is_reported_with_body_ref() {
        let err = root_of("<head><title>t</title></head>").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyBody);
        assert_eq!(err.node().unwrap().label, "<body>");
    }

    #[test]
    fn blank_body_error_is_not_masked_by_document_search() {
        let err = root_of("<html><body> </body></html>").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyBody);
        assert_eq!(err.message(), "body tag has no valid content");
    }

    #[test]
    fn empty_body_path_points_at_body() {
        let err = root_of("<html><body> </body></html>").unwrap_err();
        let node = err.node().unwrap();
        assert_eq!(node.path, vec![0, 1]);
        assert_eq!(node.label, "<body>");

        let err = root_of("<!DOCTYPE html><html><body></body></html>").unwrap_err();
        assert_eq!(err.node().unwrap().path, vec![1, 1]);
    }

    #[test]
    fn frameset_document_has_no_body() {
        let err = root_of("<html><head></head><frameset></frameset></html>").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoBody);
        let node = err.node().unwrap();
        assert_eq!(node.path, vec![0]);
        assert_eq!(node.label, "<html>");
    }

    #[test]
    fn nil_node_is_empty_node() {
        let err = find_content(None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyNode);
    }

    #[test]
    fn childless_non_element_has_no_content() {
        let dom = dom::parse("<!-- only a comment --><p>x</p>").unwrap();
        let comment = dom::children(&dom.document).into_iter().next().unwrap();
        assert_eq!(dom::kind(&comment), NodeKind::Comment);
        let err = find_content(Some(&comment)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoContent);
        assert_eq!(err.node().unwrap().label, "#comment");
        assert!(err.node().unwrap().path.is_empty());
    }

    #[test]
    fn bare_element_is_its_own_content() {
        let dom = dom::parse("<section><p>x</p></section>").unwrap();
        let html = dom::children(&dom.document).pop().unwrap();
        let body = dom::children(&html).pop().unwrap();
        let section = dom::children(&body).pop().unwrap();
        let root = find_content(Some(&section)).unwrap();
        assert_eq!(dom::tag_name(&root.node).as_deref(), Some("section"));
        assert!(root.node_ref.path.is_empty());
    }
}
