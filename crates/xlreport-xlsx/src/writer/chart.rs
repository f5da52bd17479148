//! DrawingML parts: one drawing per chart-bearing sheet, one chart part per chart

use xlreport_chart::{Axis, Chart, ChartType, DataReference, SeriesName};

use super::escape_xml;

const CATEGORY_AXIS_ID: u32 = 100_000_001;
const VALUE_AXIS_ID: u32 = 100_000_002;

/// Package numbering for the charts of one sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DrawingPart {
    pub sheet_index: usize,
    /// `xl/drawings/drawing{n}.xml`
    pub drawing_number: usize,
    /// Number of this sheet's first `xl/charts/chart{n}.xml`
    pub first_chart_number: usize,
    pub chart_count: usize,
}

impl DrawingPart {
    pub fn chart_numbers(&self) -> std::ops::Range<usize> {
        self.first_chart_number..self.first_chart_number + self.chart_count
    }
}

/// `xl/drawings/drawingN.xml`: a one-cell anchor per chart, chart k
/// referenced as `rId{k+1}`
pub(crate) fn drawing_xml(charts: &[Chart]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<xdr:wsDr xmlns:xdr="http://schemas.openxmlformats.org/drawingml/2006/spreadsheetDrawing" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main">"#,
    );

    for (i, chart) in charts.iter().enumerate() {
        let anchor = &chart.anchor;
        xml.push_str(&format!(
            r#"
    <xdr:oneCellAnchor>
        <xdr:from><xdr:col>{}</xdr:col><xdr:colOff>0</xdr:colOff><xdr:row>{}</xdr:row><xdr:rowOff>0</xdr:rowOff></xdr:from>
        <xdr:ext cx="{}" cy="{}"/>
        <xdr:graphicFrame macro="">
            <xdr:nvGraphicFramePr><xdr:cNvPr id="{}" name="Chart {}"/><xdr:cNvGraphicFramePr/></xdr:nvGraphicFramePr>
            <xdr:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/></xdr:xfrm>
            <a:graphic><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/chart"><c:chart xmlns:c="http://schemas.openxmlformats.org/drawingml/2006/chart" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" r:id="rId{}"/></a:graphicData></a:graphic>
        </xdr:graphicFrame>
        <xdr:clientData/>
    </xdr:oneCellAnchor>"#,
            anchor.from.col,
            anchor.from.row,
            anchor.width_emu,
            anchor.height_emu,
            i + 2,
            i + 1,
            i + 1
        ));
    }

    xml.push_str("\n</xdr:wsDr>");
    xml
}

pub(crate) fn drawing_rels_xml(part: &DrawingPart) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    for (i, number) in part.chart_numbers().enumerate() {
        xml.push_str(&format!(
            r#"
    <Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/chart" Target="../charts/chart{}.xml"/>"#,
            i + 1,
            number
        ));
    }
    xml.push_str("\n</Relationships>");
    xml
}

/// `xl/charts/chartN.xml`
pub(crate) fn chart_xml(chart: &Chart) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<c:chartSpace xmlns:c="http://schemas.openxmlformats.org/drawingml/2006/chart" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
    <c:date1904 val="0"/>
    <c:roundedCorners val="0"/>"#,
    );
    xml.push_str(&format!("\n    <c:style val=\"{}\"/>", chart.style));

    xml.push_str("\n    <c:chart>");
    match &chart.title {
        Some(title) => {
            xml.push_str("\n        ");
            xml.push_str(&rich_title(title, 1400));
            xml.push_str("\n        <c:autoTitleDeleted val=\"0\"/>");
        }
        None => xml.push_str("\n        <c:autoTitleDeleted val=\"1\"/>"),
    }

    xml.push_str("\n        <c:plotArea>\n            <c:layout/>");
    match chart.chart_type {
        ChartType::Bar(direction) => {
            xml.push_str(&format!(
                "\n            <c:barChart><c:barDir val=\"{}\"/><c:grouping val=\"clustered\"/><c:varyColors val=\"0\"/>",
                direction.as_str()
            ));
            push_series(&mut xml, chart);
            xml.push_str(&format!(
                "\n            <c:gapWidth val=\"150\"/><c:axId val=\"{CATEGORY_AXIS_ID}\"/><c:axId val=\"{VALUE_AXIS_ID}\"/></c:barChart>"
            ));
        }
        ChartType::Line => {
            xml.push_str(
                "\n            <c:lineChart><c:grouping val=\"standard\"/><c:varyColors val=\"0\"/>",
            );
            push_series(&mut xml, chart);
            xml.push_str(&format!(
                "\n            <c:marker val=\"1\"/><c:axId val=\"{CATEGORY_AXIS_ID}\"/><c:axId val=\"{VALUE_AXIS_ID}\"/></c:lineChart>"
            ));
        }
        ChartType::Pie => {
            xml.push_str("\n            <c:pieChart><c:varyColors val=\"1\"/>");
            push_series(&mut xml, chart);
            xml.push_str("\n            <c:firstSliceAng val=\"0\"/></c:pieChart>");
        }
    }
    if chart.chart_type.has_axes() {
        push_axis(&mut xml, "catAx", &chart.category_axis, CATEGORY_AXIS_ID, VALUE_AXIS_ID);
        push_axis(&mut xml, "valAx", &chart.value_axis, VALUE_AXIS_ID, CATEGORY_AXIS_ID);
    }
    xml.push_str("\n        </c:plotArea>");

    if let Some(legend) = &chart.legend {
        xml.push_str(&format!(
            "\n        <c:legend><c:legendPos val=\"{}\"/><c:overlay val=\"{}\"/></c:legend>",
            legend.position.as_str(),
            u8::from(legend.overlay)
        ));
    }

    xml.push_str(
        r#"
        <c:plotVisOnly val="1"/>
        <c:dispBlanksAs val="gap"/>
    </c:chart>
</c:chartSpace>"#,
    );
    xml
}

fn push_series(xml: &mut String, chart: &Chart) {
    for (i, series) in chart.series.iter().enumerate() {
        xml.push_str(&format!(
            "\n            <c:ser><c:idx val=\"{i}\"/><c:order val=\"{i}\"/>"
        ));
        match &series.name {
            Some(SeriesName::Reference(r)) => {
                xml.push_str(&format!("<c:tx>{}</c:tx>", str_ref(r)));
            }
            Some(SeriesName::Literal(name)) => {
                xml.push_str(&format!("<c:tx><c:v>{}</c:v></c:tx>", escape_xml(name)));
            }
            None => {}
        }
        if let Some(categories) = &series.categories {
            xml.push_str(&format!("<c:cat>{}</c:cat>", str_ref(categories)));
        }
        xml.push_str(&format!(
            "<c:val><c:numRef><c:f>{}</c:f></c:numRef></c:val>",
            escape_xml(&series.values.formula())
        ));
        if matches!(chart.chart_type, ChartType::Line) {
            xml.push_str("<c:smooth val=\"0\"/>");
        }
        xml.push_str("</c:ser>");
    }
}

fn str_ref(reference: &DataReference) -> String {
    format!(
        "<c:strRef><c:f>{}</c:f></c:strRef>",
        escape_xml(&reference.formula())
    )
}

fn push_axis(xml: &mut String, tag: &str, axis: &Axis, id: u32, cross_id: u32) {
    xml.push_str(&format!(
        "\n            <c:{tag}><c:axId val=\"{id}\"/><c:scaling><c:orientation val=\"minMax\"/></c:scaling><c:delete val=\"0\"/><c:axPos val=\"{}\"/>",
        axis.position.as_str()
    ));
    if let Some(title) = &axis.title {
        xml.push_str(&rich_title(title, 1000));
    }
    if tag == "valAx" {
        xml.push_str("<c:majorGridlines/><c:numFmt formatCode=\"General\" sourceLinked=\"1\"/>");
    }
    xml.push_str(&format!(
        "<c:majorTickMark val=\"out\"/><c:minorTickMark val=\"none\"/><c:tickLblPos val=\"nextTo\"/><c:crossAx val=\"{cross_id}\"/><c:crosses val=\"autoZero\"/>"
    ));
    if tag == "catAx" {
        xml.push_str("<c:auto val=\"1\"/><c:lblAlgn val=\"ctr\"/><c:lblOffset val=\"100\"/>");
    } else {
        xml.push_str("<c:crossBetween val=\"between\"/>");
    }
    xml.push_str(&format!("</c:{tag}>"));
}

/// Title with a single rich-text run; `size` in hundredths of a point
fn rich_title(text: &str, size: u32) -> String {
    format!(
        "<c:title><c:tx><c:rich><a:bodyPr/><a:lstStyle/><a:p><a:pPr><a:defRPr sz=\"{size}\" b=\"0\"/></a:pPr><a:r><a:rPr lang=\"es-ES\"/><a:t>{}</a:t></a:r></a:p></c:rich></c:tx><c:overlay val=\"0\"/></c:title>",
        escape_xml(text)
    )
}
