//! Parse a small Weft program and print its syntax tree.

fn main() {
    let source = "\
needs \"ui/button\";

panel > button.primary:hover {
    color: #3366ff;
    label: \"Hello %user.name\";
}

function greet(name: string): string {
    return \"Hi \" + name;
}
";

    let tree = weft_syntax::parse_tree(source);
    if let Some(root) = &tree.root {
        print!("{root}");
    }
    for error in &tree.errors {
        eprintln!("{error}");
    }
}
