//! A tour of the main ways to read, build, and write documents.

use nodus::{Document, Node};

const SOURCE: &str = "
	MultipleNodes
	MultipleNodes
	MultipleNodes

	#NESTED
		NestedNode
		TargetNode
	#

	WithData {
		Text on line one
		Text on line two
	} second_data
	WithTypes true -50 123
";

fn find_nodes() {
    println!("== find_nodes ==");
    let doc = nodus::from_slice(SOURCE);

    match doc.find("NESTED") {
        Some(node) => println!("found: {}", node.id_str().unwrap_or("?")),
        None => println!("no node found"),
    }
    println!("missing node: {:?}", doc.find("InvalidNode").map(|n| &n.id));

    println!("\nall MultipleNodes:");
    for node in doc.children_with_id("MultipleNodes") {
        println!("  {}", node.id_str().unwrap_or("?"));
    }
}

fn data_access() {
    println!("\n== data_access ==");
    let doc = nodus::from_slice(SOURCE);

    let with_data = doc.find("WithData").expect("WithData exists");
    println!("all data of WithData:");
    for datum in &with_data.data {
        println!("  {:?}", String::from_utf8_lossy(datum));
    }
    println!("by index: {:?}", with_data.data_str_at(0));
    println!("out of bounds: {:?}", with_data.data_str_at(9));

    let with_types = doc.find("WithTypes").expect("WithTypes exists");
    println!("as bool: {:?}", with_types.bool_at(0));
    println!("as integer: {:?}", with_types.integer_at::<i32>(1));
    println!("as integer: {:?}", with_types.integer_at::<i32>(2));
}

fn build_documents() {
    println!("\n== build_documents ==");

    // By hand.
    let mut doc = Document::default();
    doc.children.push(Node::with_id("EmptyNode"));
    doc.children
        .push(Node::with_data("NodeWithData", ["data1", "data2"]));
    let mut with_children = Node::with_id("NodeWithChildren");
    with_children.children.push(Node::with_id("ChildNode"));
    doc.children.push(with_children);

    print!("{}", String::from_utf8_lossy(&nodus::to_bytes(&doc)));

    // By parsing fragments into an existing document.
    let mut doc = Document::default();
    nodus::from_slice_into(&mut doc, "EmptyNode");
    nodus::from_slice_into(&mut doc, "NodeWithData data1 data2");
    nodus::from_slice_into(&mut doc, "#NodeWithChildren\nChildNode\n#");

    print!("{}", String::from_utf8_lossy(&nodus::to_bytes(&doc)));
}

fn zero_copy_view() {
    println!("\n== zero_copy_view ==");

    // The view borrows from (and rewrites) the buffer; the buffer must
    // outlive the view.
    let mut buf = SOURCE.as_bytes().to_vec();
    let view = nodus::from_mut_slice(&mut buf);

    nodus::to_writer(std::io::stdout(), &view).expect("stdout write");
}

fn main() {
    find_nodes();
    data_access();
    build_documents();
    zero_copy_view();
}
