//! Archetypes shipped with the builtin generator.
//!
//! File paths and contents use `{{key}}` placeholders. Keys are the request
//! properties plus values derived in [`super::builtin`] (`packagePath`,
//! `dependencies`, `parentArtifactId`).

/// One file an archetype produces.
#[derive(Debug, Clone, Copy)]
pub struct ArchetypeFile {
    pub path: &'static str,
    pub content: &'static str,
    pub executable: bool,
    /// Boolean property that must be `true` for the file to be written.
    pub condition: Option<&'static str>,
}

impl ArchetypeFile {
    const fn plain(path: &'static str, content: &'static str) -> Self {
        Self {
            path,
            content,
            executable: false,
            condition: None,
        }
    }

    const fn when(mut self, flag: &'static str) -> Self {
        self.condition = Some(flag);
        self
    }

    const fn executable(mut self) -> Self {
        self.executable = true;
        self
    }
}

/// A template addressed by its Maven coordinates.
#[derive(Debug, Clone, Copy)]
pub struct Archetype {
    pub group_id: &'static str,
    pub artifact_id: &'static str,
    pub versions: &'static [&'static str],
    pub description: &'static str,
    pub files: &'static [ArchetypeFile],
}

impl Archetype {
    pub fn coordinates(&self) -> String {
        format!("{}:{}", self.group_id, self.artifact_id)
    }

    /// Resolve `LATEST` to the newest version. `None` if `requested` is unknown.
    pub fn resolve_version(&self, requested: &str) -> Option<&'static str> {
        if requested.eq_ignore_ascii_case("LATEST") || requested.eq_ignore_ascii_case("RELEASE") {
            return self.versions.last().copied();
        }
        self.versions.iter().copied().find(|v| *v == requested)
    }
}

/// All archetypes the builtin generator knows.
pub fn archetypes() -> &'static [Archetype] {
    ARCHETYPES
}

/// Look up an archetype by coordinates.
pub fn find(group_id: &str, artifact_id: &str) -> Option<&'static Archetype> {
    ARCHETYPES
        .iter()
        .find(|a| a.group_id == group_id && a.artifact_id == artifact_id)
}

static ARCHETYPES: &[Archetype] = &[Archetype {
    group_id: "com.flowlogix.archetypes",
    artifact_id: "starter",
    versions: &["1.0", "1.1", "1.2"],
    description: "Jakarta EE web application with optional Shiro, OmniFaces and PrimeFaces",
    files: STARTER_FILES,
}];

static STARTER_FILES: &[ArchetypeFile] = &[
    ArchetypeFile::plain("pom.xml", POM),
    ArchetypeFile::plain("README.md", README),
    ArchetypeFile::plain("mvnw", MVNW).executable(),
    ArchetypeFile::plain("mvnw.cmd", MVNW_CMD),
    ArchetypeFile::plain(".mvn/wrapper/maven-wrapper.properties", WRAPPER_PROPERTIES),
    ArchetypeFile::plain(
        "src/main/java/{{packagePath}}/ApplicationConfig.java",
        APPLICATION_CONFIG,
    ),
    ArchetypeFile::plain(
        "src/main/java/{{packagePath}}/HelloResource.java",
        HELLO_RESOURCE,
    ),
    ArchetypeFile::plain(
        "src/main/java/{{packagePath}}/ui/LazyUserModel.java",
        LAZY_MODEL,
    )
    .when("useLazyModel"),
    ArchetypeFile::plain("src/main/webapp/index.xhtml", INDEX_XHTML).when("usePrimeFaces"),
    ArchetypeFile::plain("src/main/webapp/WEB-INF/shiro.ini", SHIRO_INI).when("useShiro"),
    ArchetypeFile::plain(
        "src/test/java/{{packagePath}}/HelloResourceTest.java",
        HELLO_TEST,
    ),
];

const POM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0"
         xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
         xsi:schemaLocation="http://maven.apache.org/POM/4.0.0 https://maven.apache.org/xsd/maven-4.0.0.xsd">
    <modelVersion>4.0.0</modelVersion>

    <parent>
        <groupId>com.flowlogix</groupId>
        <artifactId>{{parentArtifactId}}</artifactId>
        <version>{{archetypeVersion}}</version>
        <relativePath/>
    </parent>

    <groupId>{{groupId}}</groupId>
    <artifactId>{{artifactId}}</artifactId>
    <version>{{version}}</version>
    <packaging>{{packagingType}}</packaging>
    <name>{{projectName}}</name>

    <dependencies>
{{dependencies}}    </dependencies>
</project>
"#;

const README: &str = r#"# {{projectName}}

Generated from `{{archetypeGroupId}}:{{archetypeArtifactId}}:{{archetypeVersion}}`.

Build and run:

    ./mvnw verify

Package `{{package}}`, base type `{{baseType}}`.
"#;

const MVNW: &str = r#"#!/bin/sh
# Maven wrapper launcher
set -e
MAVEN_PROJECTBASEDIR=$(cd "$(dirname "$0")" && pwd)
exec java -classpath "$MAVEN_PROJECTBASEDIR/.mvn/wrapper/maven-wrapper.jar" \
    "-Dmaven.multiModuleProjectDirectory=$MAVEN_PROJECTBASEDIR" \
    org.apache.maven.wrapper.MavenWrapperMain "$@"
"#;

const MVNW_CMD: &str = "@REM Maven wrapper launcher\r\n\
@echo off\r\n\
set MAVEN_PROJECTBASEDIR=%~dp0\r\n\
java -classpath \"%MAVEN_PROJECTBASEDIR%.mvn\\wrapper\\maven-wrapper.jar\" \
\"-Dmaven.multiModuleProjectDirectory=%MAVEN_PROJECTBASEDIR%\" \
org.apache.maven.wrapper.MavenWrapperMain %*\r\n";

const WRAPPER_PROPERTIES: &str = "distributionUrl=https://repo.maven.apache.org/maven2/org/apache/maven/apache-maven/3.9.9/apache-maven-3.9.9-bin.zip\n";

const APPLICATION_CONFIG: &str = r#"package {{package}};

import jakarta.ws.rs.ApplicationPath;
import jakarta.ws.rs.core.Application;

@ApplicationPath("api")
public class ApplicationConfig extends Application {
}
"#;

const HELLO_RESOURCE: &str = r#"package {{package}};

import jakarta.ws.rs.GET;
import jakarta.ws.rs.Path;
import jakarta.ws.rs.Produces;
import jakarta.ws.rs.core.MediaType;

@Path("hello")
public class HelloResource {
    @GET
    @Produces(MediaType.TEXT_PLAIN)
    public String hello() {
        return "Hello from {{projectName}}";
    }
}
"#;

const HELLO_TEST: &str = r#"package {{package}};

import static org.junit.jupiter.api.Assertions.assertEquals;

import org.junit.jupiter.api.Test;

class HelloResourceTest {
    @Test
    void greets() {
        assertEquals("Hello from {{projectName}}", new HelloResource().hello());
    }
}
"#;

const LAZY_MODEL: &str = r#"package {{package}}.ui;

import java.util.List;
import java.util.Map;
import org.primefaces.model.FilterMeta;
import org.primefaces.model.LazyDataModel;
import org.primefaces.model.SortMeta;

public class LazyUserModel extends LazyDataModel<String> {
    @Override
    public int count(Map<String, FilterMeta> filterBy) {
        return 0;
    }

    @Override
    public List<String> load(int first, int pageSize, Map<String, SortMeta> sortBy,
                             Map<String, FilterMeta> filterBy) {
        return List.of();
    }
}
"#;

const INDEX_XHTML: &str = r#"<!DOCTYPE html>
<html xmlns="http://www.w3.org/1999/xhtml"
      xmlns:h="jakarta.faces.html"
      xmlns:p="primefaces">
    <h:head>
        <title>{{projectName}}</title>
    </h:head>
    <h:body>
        <p:panel header="{{projectName}}">Welcome</p:panel>
    </h:body>
</html>
"#;

const SHIRO_INI: &str = r#"[main]
authc.loginUrl = /login.xhtml

[urls]
/api/** = anon
/** = authc
"#;
