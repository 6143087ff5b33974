use cielo_editor_core::{EditorMode, EditorRegistry, FormId, Markup, RichTextEditor, Selection};

const DOCUMENTS: &[&str] = &[
    "",
    "texto suelto",
    "<p>Observación de <b>Saturno</b> &amp; sus anillos</p>",
    "<H2 Class=titulo>Salida</H2><p>Nos vemos a las 22:00<br>en el mirador",
    "<p><a href=\"/static/store/blog/m31.jpg\"><img src=\"/static/store/blog/m31.jpg\" alt=\"M31 &quot;Andrómeda&quot;\"></a></p>",
    "<ul><li>uno<li>dos</ul></p></div>",
    "<!-- borrador --><p>a < b y c > d</p><!--",
    "<style>p > a { color: red }</style><p>&#x2605; &nbsp; &unknown;</p>",
    "<p attr='single' data-x=\"1\" data-x=\"2\" flag>ok</p>",
];

#[test]
fn serialization_is_stable() {
    for doc in DOCUMENTS {
        let once = Markup::parse(doc).to_html();
        let twice = Markup::parse(&once).to_html();
        assert_eq!(once, twice, "unstable serialization for {doc:?}");
    }
}

#[test]
fn rich_raw_rich_round_trip() {
    for doc in DOCUMENTS {
        let mut editor = RichTextEditor::new(doc);
        let before = editor.structured().to_html();
        editor.toggle_mode();
        editor.toggle_mode();
        assert_eq!(editor.structured().to_html(), before, "round trip changed {doc:?}");
    }
}

#[test]
fn submission_follows_last_active_surface() {
    let mut editor = RichTextEditor::new("<p>inicio</p>");

    editor.set_mode(EditorMode::Raw);
    editor.raw_mut().set_text("<p>crudo</p>");
    editor.raw_mut().set_selection(Some(Selection::collapsed(3)));
    assert_eq!(editor.submit(), "<p>crudo</p>");

    editor.set_mode(EditorMode::Rich);
    editor.structured_mut().type_text(" y más");
    assert_eq!(editor.submit(), "<p>crudo</p> y más");
}

#[test]
fn registry_routes_insertions_per_form() {
    let mut editors = EditorRegistry::new();
    editors.register(FormId::new("blog"), RichTextEditor::new("<p>blog</p>"));
    editors.register(FormId::new("actividad"), RichTextEditor::new("<p>actividad</p>"));

    assert!(editors.insert_into(&FormId::new("actividad"), "<hr>"));
    assert!(!editors.insert_into(&FormId::new("galeria"), "<hr>"));

    let blog = editors.get(&FormId::new("blog")).unwrap();
    let activity = editors.get(&FormId::new("actividad")).unwrap();
    assert_eq!(blog.structured().to_html(), "<p>blog</p>");
    assert_eq!(activity.structured().to_html(), "<p>actividad</p><hr>");
}
